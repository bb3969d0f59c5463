//! Console accounts (admin only)

use eframe::egui;
use serde_json::{json, Value};

use super::{ListView, Outcome, UiAction};
use crate::api::{ApiClient, ApiResponse};
use crate::controller::{Modal, Notice};
use crate::format;
use crate::models::{Section, User, UserList};
use crate::tasks::{Mutation, Origin};
use crate::widgets;

pub const PLACEHOLDER: &str = "No users found";

pub fn load(api: &ApiClient) -> Vec<User> {
    let list: UserList = api.get_as("/users");
    list.users
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserCard {
    pub user: User,
    pub email: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub last_login: String,
    pub created: String,
}

pub fn build(users: &[User]) -> ListView<UserCard> {
    let cards = users
        .iter()
        .map(|user| UserCard {
            user: user.clone(),
            email: user
                .email
                .clone()
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "No email".to_string()),
            is_admin: user.is_admin,
            is_active: user.is_active,
            last_login: user
                .last_login
                .as_deref()
                .map(format::format_datetime)
                .unwrap_or_else(|| "Never".to_string()),
            created: user.created_at.as_deref().map(format::format_date).unwrap_or_default(),
        })
        .collect();
    ListView::new(cards, PLACEHOLDER)
}

pub fn delete(user: &User) -> UiAction {
    UiAction::Confirm {
        prompt: format!("Delete user \"{}\"? This action cannot be undone!", user.username),
        mutation: Mutation::delete(Origin::DeleteUser, format!("/users/{}", user.id)),
    }
}

pub fn outcome(origin: Origin, response: &ApiResponse) -> Outcome {
    let outcome = Outcome::notice(Notice::from_outcome(response.success, response.message.clone()));
    if !response.success {
        return outcome;
    }
    match origin {
        Origin::AddUser => outcome.close(Modal::AddUser).reload(Section::Users),
        Origin::UpdateUser => outcome.close(Modal::EditUser).reload(Section::Users),
        _ => outcome.reload(Section::Users),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUserForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub is_admin: bool,
    pub is_active: bool,
}

impl Default for NewUserForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            email: String::new(),
            is_admin: false,
            is_active: true,
        }
    }
}

impl NewUserForm {
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }

    pub fn submit(&self) -> Mutation {
        Mutation::post(
            Origin::AddUser,
            "/users",
            json!({
                "username": self.username.trim(),
                "password": self.password,
                "email": self.email.trim(),
                "is_admin": self.is_admin,
                "is_active": self.is_active,
            }),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditUserForm {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub is_active: bool,
    /// Left blank to keep the current password
    pub password: String,
}

impl EditUserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone().unwrap_or_default(),
            is_admin: user.is_admin,
            is_active: user.is_active,
            password: String::new(),
        }
    }

    pub fn submit(&self) -> Mutation {
        let mut body = json!({
            "username": self.username.trim(),
            "email": self.email.trim(),
            "is_admin": self.is_admin,
            "is_active": self.is_active,
        });
        if !self.password.is_empty() {
            body["password"] = Value::String(self.password.clone());
        }
        Mutation::put(Origin::UpdateUser, format!("/users/{}", self.id), body)
    }
}

#[derive(Default)]
pub struct UsersPanel {
    pub view: Option<ListView<UserCard>>,
    pub new_form: NewUserForm,
    pub edit_form: EditUserForm,
}

impl UsersPanel {
    pub fn apply(&mut self, users: &[User]) {
        self.view = Some(build(users));
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let mut edit = None;

        if ui.button("➕ Add User").clicked() {
            actions.push(UiAction::OpenModal(Modal::AddUser));
        }
        ui.add_space(10.0);

        let Some(list) = &self.view else {
            widgets::loading(ui);
            return actions;
        };

        match list {
            ListView::Empty(text) => widgets::placeholder(ui, text),
            ListView::Items(cards) => {
                for card in cards {
                    widgets::card(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.heading(&card.user.username);
                                ui.label(egui::RichText::new(&card.email).small().color(widgets::MUTED));
                            });
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                widgets::state_badge(ui, card.is_active, "✅ Active", "❌ Inactive");
                                if card.is_admin {
                                    widgets::badge(ui, "👑 Admin", widgets::ACCENT);
                                }
                            });
                        });
                        widgets::info_row(ui, "Last Login:", &card.last_login);
                        widgets::info_row(ui, "Created:", &card.created);
                        ui.horizontal(|ui| {
                            if ui.button("✏ Edit").clicked() {
                                edit = Some(EditUserForm::from_user(&card.user));
                            }
                            if ui.button("🗑 Delete").clicked() {
                                actions.push(delete(&card.user));
                            }
                        });
                    });
                }
            }
        }

        if let Some(form) = edit {
            self.edit_form = form;
            actions.push(UiAction::OpenModal(Modal::EditUser));
        }
        actions
    }

    pub fn show_new_form(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let form = &mut self.new_form;

        ui.heading("➕ Add User");
        ui.add_space(8.0);
        widgets::text_field(ui, "Username", &mut form.username, "operator");
        widgets::field_label(ui, "Password");
        ui.add(egui::TextEdit::singleline(&mut form.password).password(true).desired_width(f32::INFINITY));
        widgets::text_field(ui, "Email", &mut form.email, "ops@example.com");
        ui.checkbox(&mut form.is_admin, "Administrator");
        ui.checkbox(&mut form.is_active, "Active");

        match widgets::form_buttons(ui, "Add User", form.is_complete()) {
            Some(widgets::FormButton::Submit) => actions.push(UiAction::Mutate(form.submit())),
            Some(widgets::FormButton::Cancel) => actions.push(UiAction::CloseModal(Modal::AddUser)),
            None => {}
        }
        actions
    }

    pub fn show_edit_form(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let form = &mut self.edit_form;

        ui.heading("✏ Edit User");
        ui.add_space(8.0);
        widgets::text_field(ui, "Username", &mut form.username, "operator");
        widgets::text_field(ui, "Email", &mut form.email, "ops@example.com");
        widgets::field_label(ui, "New Password");
        ui.add(
            egui::TextEdit::singleline(&mut form.password)
                .password(true)
                .hint_text("Leave blank to keep current")
                .desired_width(f32::INFINITY),
        );
        ui.checkbox(&mut form.is_admin, "Administrator");
        ui.checkbox(&mut form.is_active, "Active");

        match widgets::form_buttons(ui, "Save", !form.username.trim().is_empty()) {
            Some(widgets::FormButton::Submit) => actions.push(UiAction::Mutate(form.submit())),
            Some(widgets::FormButton::Cancel) => actions.push(UiAction::CloseModal(Modal::EditUser)),
            None => {}
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::testing::{client, FakeTransport};

    #[test]
    fn test_cards() {
        let fake = FakeTransport::new();
        fake.route(
            Method::Get,
            "/users",
            r#"{"users":[{"id":1,"username":"admin","email":null,"is_admin":true,"is_active":true,
                "last_login":null,"created_at":"2024-01-02T03:04:05"}]}"#,
        );
        let view = build(&load(&client(&fake)));
        let card = &view.items()[0];
        assert_eq!(card.email, "No email");
        assert_eq!(card.last_login, "Never");
        assert_eq!(card.created, "02/01/2024");
        assert!(card.is_admin && card.is_active);
        assert_eq!(build(&[]), ListView::Empty("No users found"));
    }

    #[test]
    fn test_edit_sends_password_only_when_set() {
        let user = User { id: 3, username: "ops".into(), is_active: true, ..Default::default() };
        let mut form = EditUserForm::from_user(&user);
        let body = form.submit().body.unwrap();
        assert!(body.get("password").is_none());
        assert_eq!(form.submit().path, "/users/3");
        assert_eq!(form.submit().method, Method::Put);

        form.password = "s3cret".into();
        assert_eq!(form.submit().body.unwrap()["password"], "s3cret");
    }

    #[test]
    fn test_delete_prompt_names_user() {
        let user = User { id: 8, username: "bob".into(), ..Default::default() };
        match delete(&user) {
            UiAction::Confirm { prompt, mutation } => {
                assert_eq!(prompt, "Delete user \"bob\"? This action cannot be undone!");
                assert_eq!(mutation.path, "/users/8");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_outcomes() {
        let ok = ApiResponse::from_value(json!({"success": true, "message": "User updated"}));
        let updated = outcome(Origin::UpdateUser, &ok);
        assert_eq!(updated.close, Some(Modal::EditUser));
        assert_eq!(updated.reload, Some(Section::Users));

        let refused = outcome(Origin::AddUser, &ApiResponse::failed("Username already exists"));
        assert_eq!(refused.notice, Notice::error("Username already exists"));
        assert_eq!(refused.close, None);
        assert_eq!(refused.reload, None);

        let deleted = outcome(Origin::DeleteUser, &ok);
        assert_eq!(deleted.close, None);
        assert_eq!(deleted.reload, Some(Section::Users));
    }

    #[test]
    fn test_new_user_body() {
        let form = NewUserForm { username: "ops".into(), password: "pw".into(), ..Default::default() };
        assert!(form.is_complete());
        assert_eq!(
            form.submit().body,
            Some(json!({"username": "ops", "password": "pw", "email": "", "is_admin": false, "is_active": true}))
        );
    }
}
