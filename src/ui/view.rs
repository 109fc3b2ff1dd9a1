use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::{
    avatar::avatar_for,
    chat_store::ChatStore,
    conversation::ActiveChat,
    new_group_form::{NewGroupFocus, NewGroupForm},
    shell_state::{ActivePane, Screen, ShellState},
    sidebar_state::SidebarEntry,
};

use super::{
    message_input::{render_input, InputField},
    message_rendering::{
        build_message_list_elements, element_to_list_item, sender_name,
        EMPTY_CONVERSATION_TEXT,
    },
    styles::{self, Palette},
};

const APP_TITLE: &str = "LAN Chat";
const CONNECTING_TEXT: &str = "Connecting...";
const NO_CHAT_TEXT: &str = "Select a user or group to start chatting";

pub fn render(frame: &mut Frame<'_>, state: &ShellState, store: &ChatStore, server_url: &str) {
    let palette = styles::palette(store.is_dark_mode());
    frame.render_widget(Block::default().style(palette.base_style()), frame.area());

    match state.screen() {
        Screen::Login => render_login(frame, state, server_url, &palette),
        Screen::Chat => render_chat(frame, state, store, &palette),
    }
}

// =============================================================================
// Login screen
// =============================================================================

fn render_login(frame: &mut Frame<'_>, state: &ShellState, server_url: &str, palette: &Palette) {
    let area = centered_rect(56, 12, frame.area());
    let block = Block::default()
        .title(Span::styled(format!(" {APP_TITLE} "), palette.title_style()))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(palette.active_border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(inner);

    let server = Paragraph::new(Line::from(vec![
        Span::styled("Server: ", palette.muted_style()),
        Span::raw(server_url.to_owned()),
    ]));
    frame.render_widget(server, rows[0]);

    let login = state.login();
    render_input(
        frame,
        rows[1],
        login.input(),
        &InputField {
            title: "Username",
            placeholder: "Choose a username",
            focused: !login.is_joining(),
        },
        palette,
    );

    let feedback = if login.is_joining() {
        Line::from(Span::styled(CONNECTING_TEXT, palette.muted_style()))
    } else if let Some(error) = login.error() {
        Line::from(Span::styled(error.to_owned(), palette.error_style()))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(feedback).wrap(Wrap { trim: true }), rows[2]);

    let hint = Paragraph::new("Enter: join | Ctrl+T: theme | Ctrl+C: quit")
        .style(palette.muted_style())
        .alignment(Alignment::Center);
    frame.render_widget(hint, rows[3]);
}

// =============================================================================
// Chat screen
// =============================================================================

fn render_chat(frame: &mut Frame<'_>, state: &ShellState, store: &ChatStore, palette: &Palette) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(root[0]);

    render_sidebar(frame, columns[0], state, store, palette);
    render_conversation(frame, columns[1], state, store, palette);

    let status = Paragraph::new(status_line(state, store, palette));
    frame.render_widget(status, root[1]);

    if let Some(form) = state.new_group() {
        render_new_group(frame, form, palette);
    }
}

fn render_sidebar(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &ShellState,
    store: &ChatStore,
    palette: &Palette,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let sidebar = state.sidebar();
    render_input(
        frame,
        rows[0],
        sidebar.search(),
        &InputField {
            title: "Search",
            placeholder: "Search users or groups",
            focused: state.active_pane() == ActivePane::Search,
        },
        palette,
    );

    let is_active = matches!(state.active_pane(), ActivePane::Sidebar | ActivePane::Search);
    let border_style = if is_active {
        palette.active_border_style()
    } else {
        palette.inactive_border_style()
    };
    let title = match store.current_user() {
        Some(me) => format!("Chats | {}", me.username),
        None => "Chats".to_owned(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let entries = sidebar.entries();
    let label_width = usize::from(rows[1].width.saturating_sub(2)).saturating_sub(5);
    let searching = !sidebar.search().is_empty();
    let items = build_sidebar_items(entries, store, searching, label_width, palette);
    let list = List::new(items)
        .block(block)
        .highlight_style(palette.selected_row_style());

    let mut list_state = ListState::default();
    list_state.select(
        sidebar
            .selected_index()
            .map(|index| compute_visual_index(entries, index)),
    );
    frame.render_stateful_widget(list, rows[1], &mut list_state);
}

/// Users first, then groups, each under a header carrying its count.
///
/// An empty section keeps its header and shows one placeholder row instead.
fn build_sidebar_items(
    entries: &[SidebarEntry],
    store: &ChatStore,
    searching: bool,
    label_width: usize,
    palette: &Palette,
) -> Vec<ListItem<'static>> {
    let (users, groups): (Vec<&SidebarEntry>, Vec<&SidebarEntry>) = entries
        .iter()
        .partition(|entry| matches!(entry, SidebarEntry::User { .. }));
    let mut items = Vec::with_capacity(entries.len() + 4);

    items.push(section_header("Users", users.len(), palette));
    if users.is_empty() {
        let text = if searching {
            "No users found"
        } else {
            "No other users online"
        };
        items.push(placeholder_row(text, palette));
    }
    items.extend(
        users
            .iter()
            .map(|entry| ListItem::new(sidebar_entry_line(entry, store, label_width, palette))),
    );

    items.push(section_header("Groups", groups.len(), palette));
    if groups.is_empty() {
        let text = if searching {
            "No groups found"
        } else {
            "No groups created yet"
        };
        items.push(placeholder_row(text, palette));
    }
    items.extend(
        groups
            .iter()
            .map(|entry| ListItem::new(sidebar_entry_line(entry, store, label_width, palette))),
    );

    items
}

fn section_header(title: &str, count: usize, palette: &Palette) -> ListItem<'static> {
    ListItem::new(Line::from(Span::styled(
        format!("-- {title} ({count}) --"),
        palette.section_header_style(),
    )))
}

fn placeholder_row(text: &str, palette: &Palette) -> ListItem<'static> {
    ListItem::new(Line::from(Span::styled(
        format!("  {text}"),
        palette.muted_style(),
    )))
}

/// Maps an entry index to its row in the list, accounting for headers and
/// the placeholder of an empty user section.
fn compute_visual_index(entries: &[SidebarEntry], index: usize) -> usize {
    let users = entries
        .iter()
        .take_while(|entry| matches!(entry, SidebarEntry::User { .. }))
        .count();

    if index < users {
        index + 1
    } else {
        1 + users.max(1) + 1 + (index - users)
    }
}

fn sidebar_entry_line(
    entry: &SidebarEntry,
    store: &ChatStore,
    label_width: usize,
    palette: &Palette,
) -> Line<'static> {
    let avatar = avatar_for(entry.label());
    let mut spans = vec![
        Span::styled(format!("{:^4}", avatar.initials), styles::avatar_style(avatar.color)),
        Span::raw(" "),
    ];

    match entry {
        SidebarEntry::User { username, .. } => {
            spans.push(Span::raw(truncate_to_width(username, label_width)));
        }
        SidebarEntry::Group { id, name } => {
            let members = store.group(id).map_or(0, |group| group.members.len());
            let note = format!(" {members} members");
            let name_width = label_width.saturating_sub(note.width());
            spans.push(Span::raw(truncate_to_width(&format!("# {name}"), name_width)));
            spans.push(Span::styled(note, palette.muted_style()));
        }
    }

    Line::from(spans)
}

fn render_conversation(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &ShellState,
    store: &ChatStore,
    palette: &Palette,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    let active = store.active_chat();
    let members_area = match active {
        ActiveChat::Group(_) if state.show_members() => {
            let split = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
                .split(rows[0]);
            render_messages(frame, split[0], store, palette);
            Some(split[1])
        }
        _ => {
            render_messages(frame, rows[0], store, palette);
            None
        }
    };

    if let (Some(members_area), ActiveChat::Group(group_id)) = (members_area, active) {
        render_members(frame, members_area, store, group_id, palette);
    }

    if let Some(indicator) = typing_indicator(store) {
        let line = Paragraph::new(Span::styled(indicator, palette.typing_style()));
        frame.render_widget(line, rows[1]);
    }

    if active.is_open() {
        render_input(
            frame,
            rows[2],
            state.composer(),
            &InputField {
                title: "Message",
                placeholder: "Type a message...",
                focused: state.active_pane() == ActivePane::Composer,
            },
            palette,
        );
    }
}

fn render_messages(frame: &mut Frame<'_>, area: Rect, store: &ChatStore, palette: &Palette) {
    let active = store.active_chat();
    let title = match active {
        ActiveChat::None => "Messages".to_owned(),
        ActiveChat::Private(_) => format!("Messages | {}", store.active_chat_title()),
        ActiveChat::Group(_) => format!("Messages | # {}", store.active_chat_title()),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(palette.inactive_border_style());

    let messages = match active {
        ActiveChat::None => {
            let panel = Paragraph::new(NO_CHAT_TEXT)
                .style(palette.muted_style())
                .block(block);
            frame.render_widget(panel, area);
            return;
        }
        ActiveChat::Private(peer_id) => store.private_messages_with(peer_id),
        ActiveChat::Group(group_id) => store.group_messages(group_id),
    };

    if messages.is_empty() {
        let panel = Paragraph::new(EMPTY_CONVERSATION_TEXT)
            .style(palette.muted_style())
            .block(block);
        frame.render_widget(panel, area);
        return;
    }

    let elements = build_message_list_elements(messages, store);
    let items: Vec<ListItem<'static>> = elements
        .iter()
        .map(|element| element_to_list_item(element, palette))
        .collect();

    // Keep the newest message in view.
    let mut list_state = ListState::default();
    list_state.select(Some(items.len().saturating_sub(1)));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut list_state);
}

fn render_members(
    frame: &mut Frame<'_>,
    area: Rect,
    store: &ChatStore,
    group_id: &str,
    palette: &Palette,
) {
    let width = usize::from(area.width.saturating_sub(2));
    let items: Vec<ListItem<'static>> = group_members(store, group_id)
        .into_iter()
        .map(|name| ListItem::new(truncate_to_width(name, width)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title("Members")
            .borders(Borders::ALL)
            .border_style(palette.inactive_border_style()),
    );
    frame.render_widget(list, area);
}

/// Usernames of the group's members in group order, skipping members that
/// are not in the roster.
fn group_members<'a>(store: &'a ChatStore, group_id: &str) -> Vec<&'a str> {
    let Some(group) = store.group(group_id) else {
        return Vec::new();
    };

    group
        .members
        .iter()
        .filter_map(|member_id| store.user(member_id))
        .map(|user| user.username.as_str())
        .collect()
}

fn typing_indicator(store: &ChatStore) -> Option<String> {
    match store.active_chat() {
        ActiveChat::None => None,
        ActiveChat::Private(peer_id) => store
            .is_typing(peer_id)
            .then(|| format!("{} is typing...", sender_name(store, peer_id))),
        ActiveChat::Group(group_id) => {
            let names: Vec<&str> = store
                .group_typing_members(group_id)
                .into_iter()
                .map(|user_id| sender_name(store, user_id))
                .collect();
            match names.as_slice() {
                [] => None,
                [name] => Some(format!("{name} is typing...")),
                _ => Some(format!("{} are typing...", names.join(", "))),
            }
        }
    }
}

// =============================================================================
// New group dialog
// =============================================================================

fn render_new_group(frame: &mut Frame<'_>, form: &NewGroupForm, palette: &Palette) {
    let list_height = form.candidates().len().clamp(1, 8) as u16;
    let area = centered_rect(48, list_height + 9, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(" New group ", palette.title_style()))
        .borders(Borders::ALL)
        .border_style(palette.active_border_style())
        .style(palette.base_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    render_input(
        frame,
        rows[0],
        form.name(),
        &InputField {
            title: "Group name",
            placeholder: "Enter a group name",
            focused: form.focus() == NewGroupFocus::Name,
        },
        palette,
    );

    let members_focused = form.focus() == NewGroupFocus::Members;
    let member_block = Block::default()
        .title("Members")
        .borders(Borders::ALL)
        .border_style(if members_focused {
            palette.active_border_style()
        } else {
            palette.inactive_border_style()
        });

    if form.candidates().is_empty() {
        let empty = Paragraph::new("No other users online")
            .style(palette.muted_style())
            .block(member_block);
        frame.render_widget(empty, rows[1]);
    } else {
        let items: Vec<ListItem<'static>> = form
            .candidates()
            .iter()
            .map(|(id, username)| {
                let mark = if form.is_selected(id) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{mark} {username}"))
            })
            .collect();
        let list = List::new(items)
            .block(member_block)
            .highlight_style(palette.selected_row_style());
        let mut list_state = ListState::default();
        list_state.select(members_focused.then_some(form.cursor()));
        frame.render_stateful_widget(list, rows[1], &mut list_state);
    }

    if let Some(error) = form.error() {
        let line = Paragraph::new(Span::styled(error.to_owned(), palette.error_style()));
        frame.render_widget(line, rows[2]);
    }

    let hint = Paragraph::new("Tab: switch | Space: toggle | Enter: create | Esc: cancel")
        .style(palette.muted_style());
    frame.render_widget(hint, rows[3]);
}

// =============================================================================
// Status line
// =============================================================================

fn status_line(state: &ShellState, store: &ChatStore, palette: &Palette) -> Line<'static> {
    let (connection, connection_style) = if store.is_connected() {
        ("connected", palette.connected_style())
    } else {
        ("disconnected", palette.disconnected_style())
    };

    let mut spans = vec![Span::styled(connection, connection_style)];

    if let Some(notice) = state.notice() {
        spans.push(Span::styled(" | ", palette.muted_style()));
        spans.push(Span::styled(notice.to_owned(), palette.error_style()));
    }

    spans.push(Span::styled(
        format!(" | {}", pane_hint(state, store)),
        palette.muted_style(),
    ));

    Line::from(spans)
}

fn pane_hint(state: &ShellState, store: &ChatStore) -> &'static str {
    if state.new_group().is_some() {
        return "creating a group";
    }

    match state.active_pane() {
        ActivePane::Sidebar => {
            if matches!(store.active_chat(), ActiveChat::Group(_)) {
                "j/k: navigate | Enter: open | /: search | Tab: compose | ^G: members | ^N: new group | ^L: logout | ^T: theme"
            } else {
                "j/k: navigate | Enter: open | /: search | Tab: compose | ^N: new group | ^L: logout | ^T: theme"
            }
        }
        ActivePane::Search => "type to filter | Enter: open | Esc: clear | Tab: back",
        ActivePane::Composer => "Enter: send | Esc/Tab: back to chats",
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Cuts `text` to at most `max_width` terminal columns, marking the cut.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_owned();
    }

    let budget = max_width.saturating_sub(3);
    let mut used = 0;
    let mut truncated = String::new();
    for ch in text.chars() {
        let width = ch.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        truncated.push(ch);
    }

    if max_width >= 3 {
        truncated.push_str("...");
    }
    truncated
}
