use super::{
    login_form::LoginFormState, new_group_form::NewGroupForm, sidebar_state::SidebarState,
    text_input_state::TextInputState, typing_signal::TypingSignal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivePane {
    #[default]
    Sidebar,
    Search,
    Composer,
}

/// Local UI state that never leaves the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    running: bool,
    screen: Screen,
    active_pane: ActivePane,
    login: LoginFormState,
    sidebar: SidebarState,
    composer: TextInputState,
    typing: TypingSignal,
    new_group: Option<NewGroupForm>,
    show_members: bool,
    notice: Option<String>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new(TypingSignal::default())
    }
}

impl ShellState {
    pub fn new(typing: TypingSignal) -> Self {
        Self {
            running: true,
            screen: Screen::Login,
            active_pane: ActivePane::Sidebar,
            login: LoginFormState::default(),
            sidebar: SidebarState::default(),
            composer: TextInputState::default(),
            typing,
            new_group: None,
            show_members: false,
            notice: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Switches to the chat screen with the sidebar focused.
    pub fn enter_chat(&mut self) {
        self.screen = Screen::Chat;
        self.active_pane = ActivePane::Sidebar;
    }

    /// Returns to a blank login screen; only the typing debounce survives.
    pub fn return_to_login(&mut self) {
        let typing = TypingSignal::new(self.typing_idle());
        *self = Self::new(typing);
    }

    pub fn active_pane(&self) -> ActivePane {
        self.active_pane
    }

    pub fn set_active_pane(&mut self, pane: ActivePane) {
        self.active_pane = pane;
    }

    pub fn login(&self) -> &LoginFormState {
        &self.login
    }

    pub fn login_mut(&mut self) -> &mut LoginFormState {
        &mut self.login
    }

    pub fn sidebar(&self) -> &SidebarState {
        &self.sidebar
    }

    pub fn sidebar_mut(&mut self) -> &mut SidebarState {
        &mut self.sidebar
    }

    pub fn composer(&self) -> &TextInputState {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut TextInputState {
        &mut self.composer
    }

    pub fn typing_mut(&mut self) -> &mut TypingSignal {
        &mut self.typing
    }

    pub fn new_group(&self) -> Option<&NewGroupForm> {
        self.new_group.as_ref()
    }

    pub fn new_group_mut(&mut self) -> Option<&mut NewGroupForm> {
        self.new_group.as_mut()
    }

    pub fn open_new_group(&mut self, form: NewGroupForm) {
        self.new_group = Some(form);
    }

    pub fn close_new_group(&mut self) {
        self.new_group = None;
    }

    pub fn show_members(&self) -> bool {
        self.show_members
    }

    pub fn toggle_members(&mut self) {
        self.show_members = !self.show_members;
    }

    pub fn hide_members(&mut self) {
        self.show_members = false;
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    fn typing_idle(&self) -> std::time::Duration {
        self.typing.idle_after()
    }
}
