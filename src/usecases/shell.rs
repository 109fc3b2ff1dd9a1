use std::{
    cell::Ref,
    time::{Duration, Instant},
};

use anyhow::Result;
use chrono::Utc;

use crate::{
    domain::{
        chat_store::ChatStore,
        conversation::ActiveChat,
        events::{AppEvent, KeyInput},
        new_group_form::{NewGroupFocus, NewGroupForm},
        shell_state::{ActivePane, Screen, ShellState},
        typing_signal::TypingSignal,
    },
    infra::contracts::PreferenceStore,
    session::{client::ChatSession, transport::Transport},
    usecases::{
        contracts::ShellOrchestrator,
        create_group::create_group,
        login::{advance_login, begin_login, LoginProgress},
        logout::logout,
        open_chat::{open_chat, OpenChatOutcome},
        send_message::send_message,
        store_wiring::WiredStore,
        theme::toggle_dark_mode,
        typing::{on_composer_keystroke, poll_typing, stop_typing},
    },
};

const THEME_SAVE_FAILED: &str = "THEME_SAVE_FAILED";
const THEME_SAVE_FAILED_NOTICE: &str = "Could not save the theme preference.";

/// Drives the chat client: routes keys, pumps the session, and keeps local UI
/// state in step with the store.
pub struct DefaultShellOrchestrator<T, P>
where
    T: Transport,
    P: PreferenceStore,
{
    state: ShellState,
    session: ChatSession<T>,
    wired: WiredStore,
    preferences: P,
}

impl<T, P> DefaultShellOrchestrator<T, P>
where
    T: Transport,
    P: PreferenceStore,
{
    pub fn new(
        session: ChatSession<T>,
        wired: WiredStore,
        preferences: P,
        typing_idle: Duration,
    ) -> Self {
        Self {
            state: ShellState::new(TypingSignal::new(typing_idle)),
            session,
            wired,
            preferences,
        }
    }

    fn on_tick(&mut self, now: Instant) {
        self.session.pump();

        if self.state.login().is_joining() {
            self.advance_login();
        }

        if self.state.screen() == Screen::Chat {
            let store = self.wired.store().borrow();
            poll_typing(
                &mut self.session,
                store.active_chat(),
                self.state.typing_mut(),
                now,
            );
        }

        self.refresh_sidebar();
    }

    fn on_key(&mut self, key: KeyInput, now: Instant) {
        self.state.clear_notice();

        if key.ctrl && key.key == "t" {
            self.toggle_theme();
            return;
        }

        match self.state.screen() {
            Screen::Login => self.on_login_key(&key),
            Screen::Chat => self.on_chat_key(&key, now),
        }
    }

    fn on_login_key(&mut self, key: &KeyInput) {
        if self.state.login().is_joining() {
            return;
        }

        if key.key == "enter" {
            if begin_login(self.state.login_mut(), &mut self.session).is_ok() {
                self.advance_login();
            }
            return;
        }

        edit_text(self.state.login_mut().input_mut(), key);
    }

    fn advance_login(&mut self) {
        let progress = {
            let mut store = self.wired.store().borrow_mut();
            advance_login(
                self.state.login_mut(),
                &mut self.session,
                &mut store,
                Utc::now(),
            )
        };

        if let LoginProgress::Joined(user) = progress {
            tracing::info!(user_id = %user.id, username = %user.username, "joined chat");
            self.state.enter_chat();
            self.refresh_sidebar();
        }
    }

    fn on_chat_key(&mut self, key: &KeyInput, now: Instant) {
        if self.state.new_group().is_some() {
            self.on_new_group_key(key);
            return;
        }

        if key.ctrl {
            match key.key.as_str() {
                "n" => self.open_new_group(),
                "l" => self.logout(),
                "g" => self.toggle_members(),
                "f" => self.state.set_active_pane(ActivePane::Search),
                _ => {}
            }
            return;
        }

        match self.state.active_pane() {
            ActivePane::Sidebar => self.on_sidebar_key(key),
            ActivePane::Search => self.on_search_key(key),
            ActivePane::Composer => self.on_composer_key(key, now),
        }
    }

    fn on_sidebar_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "down" | "j" => self.state.sidebar_mut().select_next(),
            "up" | "k" => self.state.sidebar_mut().select_previous(),
            "enter" => self.open_selected_chat(),
            "/" => self.state.set_active_pane(ActivePane::Search),
            "tab" => {
                if self.wired.store().borrow().active_chat().is_open() {
                    self.state.set_active_pane(ActivePane::Composer);
                }
            }
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "down" => self.state.sidebar_mut().select_next(),
            "up" => self.state.sidebar_mut().select_previous(),
            "enter" => self.open_selected_chat(),
            "tab" => self.state.set_active_pane(ActivePane::Sidebar),
            "esc" => {
                self.state.sidebar_mut().search_mut().clear();
                self.state.set_active_pane(ActivePane::Sidebar);
            }
            _ => {
                edit_text(self.state.sidebar_mut().search_mut(), key);
            }
        }

        self.refresh_sidebar();
    }

    fn on_composer_key(&mut self, key: &KeyInput, now: Instant) {
        match key.key.as_str() {
            "enter" => self.send_composed_message(),
            "esc" | "tab" => self.leave_composer(),
            _ => {
                if edit_text(self.state.composer_mut(), key) {
                    let store = self.wired.store().borrow();
                    on_composer_keystroke(
                        &mut self.session,
                        store.active_chat(),
                        self.state.typing_mut(),
                        now,
                    );
                }
            }
        }
    }

    fn on_new_group_key(&mut self, key: &KeyInput) {
        let Some(form) = self.state.new_group_mut() else {
            return;
        };

        match key.key.as_str() {
            "esc" => {
                self.state.close_new_group();
                return;
            }
            "tab" => form.toggle_focus(),
            "enter" => {
                if create_group(&mut self.session, form).is_ok() {
                    self.state.close_new_group();
                }
                return;
            }
            _ => match form.focus() {
                NewGroupFocus::Name => {
                    edit_text(form.name_mut(), key);
                }
                NewGroupFocus::Members => match key.key.as_str() {
                    "down" | "j" => form.cursor_down(),
                    "up" | "k" => form.cursor_up(),
                    " " => form.toggle_under_cursor(),
                    _ => {}
                },
            },
        }
    }

    fn open_selected_chat(&mut self) {
        let Some(entry) = self.state.sidebar().selected_entry().cloned() else {
            return;
        };

        let outcome = {
            let mut store = self.wired.store().borrow_mut();
            open_chat(
                &mut self.session,
                &mut store,
                self.state.typing_mut(),
                &entry,
            )
        };

        if outcome == OpenChatOutcome::Opened {
            self.state.composer_mut().clear();
            self.state.hide_members();
            self.state.set_active_pane(ActivePane::Composer);
        }
    }

    fn send_composed_message(&mut self) {
        let text = self.state.composer().text().to_owned();
        let result = {
            let store = self.wired.store().borrow();
            send_message(&mut self.session, &store, self.state.typing_mut(), &text)
        };

        match result {
            Ok(()) => self.state.composer_mut().clear(),
            Err(error) => tracing::debug!(error = %error, "message not sent"),
        }
    }

    fn leave_composer(&mut self) {
        {
            let store = self.wired.store().borrow();
            stop_typing(&mut self.session, store.active_chat(), self.state.typing_mut());
        }
        self.state.set_active_pane(ActivePane::Sidebar);
    }

    fn open_new_group(&mut self) {
        let candidates = self
            .wired
            .store()
            .borrow()
            .other_users()
            .map(|user| (user.id.clone(), user.username.clone()))
            .collect();
        self.state.open_new_group(NewGroupForm::new(candidates));
    }

    fn toggle_members(&mut self) {
        if matches!(
            self.wired.store().borrow().active_chat(),
            ActiveChat::Group(_)
        ) {
            self.state.toggle_members();
        }
    }

    fn logout(&mut self) {
        logout(
            &mut self.session,
            self.wired.store(),
            self.state.typing_mut(),
        );
        self.state.return_to_login();
    }

    fn toggle_theme(&mut self) {
        let result = {
            let mut store = self.wired.store().borrow_mut();
            toggle_dark_mode(&mut store, &mut self.preferences)
        };

        if let Err(error) = result {
            tracing::warn!(code = THEME_SAVE_FAILED, error = %error, "theme not toggled");
            self.state.set_notice(THEME_SAVE_FAILED_NOTICE);
        }
    }

    fn refresh_sidebar(&mut self) {
        let store = self.wired.store().borrow();
        self.state.sidebar_mut().refresh(&store);
    }
}

/// Applies a key to a text field; returns true when the text changed.
fn edit_text(input: &mut crate::domain::text_input_state::TextInputState, key: &KeyInput) -> bool {
    if let Some(ch) = key.as_char() {
        return input.insert_char(ch);
    }

    if key.ctrl {
        return false;
    }

    input.apply_key(&key.key).unwrap_or(false)
}

impl<T, P> ShellOrchestrator for DefaultShellOrchestrator<T, P>
where
    T: Transport,
    P: PreferenceStore,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn store(&self) -> Ref<'_, ChatStore> {
        self.wired.store().borrow()
    }

    fn server_url(&self) -> &str {
        self.session.server_url()
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        let now = Instant::now();
        match event {
            AppEvent::Tick => self.on_tick(now),
            AppEvent::QuitRequested => {
                {
                    let store = self.wired.store().borrow();
                    stop_typing(&mut self.session, store.active_chat(), self.state.typing_mut());
                }
                self.session.disconnect();
                self.state.stop();
            }
            AppEvent::InputKey(key) => self.on_key(key, now),
        }

        Ok(())
    }
}
