use crate::{
    domain::new_group_form::{NewGroupError, NewGroupForm, NewGroupRequest},
    usecases::contracts::ChatGateway,
};

/// Validates the dialog and asks the server to create the group.
///
/// The new group appears once the server broadcasts the updated group list.
pub fn create_group(
    gateway: &mut dyn ChatGateway,
    form: &mut NewGroupForm,
) -> Result<NewGroupRequest, NewGroupError> {
    let request = form.submit()?;
    gateway.create_group(&request.name, &request.members);

    tracing::info!(
        name = %request.name,
        members = request.members.len(),
        "group creation requested"
    );
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{client::fakes::connected_session, protocol::ClientCommand};

    fn form() -> NewGroupForm {
        NewGroupForm::new(vec![
            ("s2".to_owned(), "bob".to_owned()),
            ("s3".to_owned(), "carol".to_owned()),
        ])
    }

    #[test]
    fn missing_members_sends_nothing() {
        let (mut session, transport) = connected_session("s1");
        let mut form = form();
        for ch in "team".chars() {
            form.name_mut().insert_char(ch);
        }

        let result = create_group(&mut session, &mut form);

        assert_eq!(result, Err(NewGroupError::NoMembers));
        assert_eq!(form.error(), Some("Please select at least one user"));
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn valid_form_sends_create_group() {
        let (mut session, transport) = connected_session("s1");
        let mut form = form();
        for ch in " team ".chars() {
            form.name_mut().insert_char(ch);
        }
        form.cursor_down();
        form.toggle_under_cursor();

        create_group(&mut session, &mut form).expect("valid form");

        assert_eq!(
            transport.sent(),
            vec![ClientCommand::CreateGroup {
                name: "team".to_owned(),
                members: vec!["s3".to_owned()],
            }]
        );
    }
}
