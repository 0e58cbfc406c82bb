use chrono::NaiveDate;

use crate::forms::{CategoryForm, LoginForm, RegisterForm, TransactionForm};
use crate::models::{Category, Direction, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormKind {
    Login,
    Register,
    NewCategory,
    EditCategory(i64),
    NewTransaction,
    EditTransaction(i64),
}

impl FormKind {
    pub(crate) fn title(&self) -> &'static str {
        match self {
            Self::Login => "Log in",
            Self::Register => "Create account",
            Self::NewCategory => "New category",
            Self::EditCategory(_) => "Edit category",
            Self::NewTransaction => "New transaction",
            Self::EditTransaction(_) => "Edit transaction",
        }
    }

    /// Login and register live on their own screens instead of a popup.
    pub(crate) fn is_auth(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    Secret,
    /// Cycled with Left/Right instead of typed.
    Direction,
    Category,
}

#[derive(Debug, Clone)]
pub(crate) struct Field {
    pub(crate) label: &'static str,
    pub(crate) kind: FieldKind,
    pub(crate) value: String,
}

impl Field {
    fn text(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            kind: FieldKind::Text,
            value: value.into(),
        }
    }

    fn secret(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Secret,
            value: String::new(),
        }
    }

    fn choice(label: &'static str, kind: FieldKind) -> Self {
        Self {
            label,
            kind,
            value: String::new(),
        }
    }
}

/// Editable state of whichever form is on screen.
#[derive(Debug, Clone)]
pub(crate) struct FormState {
    pub(crate) kind: FormKind,
    pub(crate) fields: Vec<Field>,
    pub(crate) focus: usize,
    pub(crate) error: Option<String>,
    pub(crate) submitting: bool,
    pub(crate) direction: Direction,
    pub(crate) categories: Vec<(i64, String)>,
    pub(crate) category: Option<usize>,
}

impl FormState {
    fn new(kind: FormKind, fields: Vec<Field>) -> Self {
        Self {
            kind,
            fields,
            focus: 0,
            error: None,
            submitting: false,
            direction: Direction::Outflow,
            categories: Vec::new(),
            category: None,
        }
    }

    pub(crate) fn login() -> Self {
        Self::new(
            FormKind::Login,
            vec![Field::text("Email", ""), Field::secret("Password")],
        )
    }

    pub(crate) fn register() -> Self {
        Self::new(
            FormKind::Register,
            vec![
                Field::text("Name", ""),
                Field::text("Email", ""),
                Field::secret("Password"),
            ],
        )
    }

    pub(crate) fn category(existing: Option<&Category>) -> Self {
        let seed = existing.map(CategoryForm::from_category).unwrap_or_default();
        let kind = existing.map_or(FormKind::NewCategory, |c| FormKind::EditCategory(c.id));
        Self::new(
            kind,
            vec![
                Field::text("Name", seed.name),
                Field::text("Description", seed.description),
            ],
        )
    }

    pub(crate) fn transaction(
        existing: Option<&Transaction>,
        categories: &[Category],
        today: NaiveDate,
    ) -> Self {
        let seed = existing.map_or_else(
            || TransactionForm::new(today),
            TransactionForm::from_transaction,
        );
        let kind = existing.map_or(FormKind::NewTransaction, |t| {
            FormKind::EditTransaction(t.id)
        });
        let mut form = Self::new(
            kind,
            vec![
                Field::text("Date", seed.date),
                Field::text("Amount", seed.amount),
                Field::choice("Type", FieldKind::Direction),
                Field::text("Description", seed.description),
                Field::choice("Category", FieldKind::Category),
            ],
        );
        form.direction = seed.direction;
        form.categories = categories.iter().map(|c| (c.id, c.name.clone())).collect();
        form.category = seed
            .category_id
            .and_then(|id| form.categories.iter().position(|(cid, _)| *cid == id));
        form
    }

    pub(crate) fn focused(&self) -> Option<&Field> {
        self.fields.get(self.focus)
    }

    pub(crate) fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub(crate) fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = if self.focus == 0 {
                self.fields.len() - 1
            } else {
                self.focus - 1
            };
        }
    }

    pub(crate) fn insert_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            match field.kind {
                FieldKind::Text | FieldKind::Secret => field.value.push(c),
                FieldKind::Direction | FieldKind::Category => {}
            }
        }
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    /// Left/Right on a choice field.
    pub(crate) fn cycle(&mut self, delta: i32) {
        let Some(kind) = self.focused().map(|f| f.kind) else {
            return;
        };
        match kind {
            FieldKind::Direction => self.direction = self.direction.toggle(),
            FieldKind::Category => {
                let len = self.categories.len();
                if len == 0 {
                    return;
                }
                self.category = Some(match (self.category, delta >= 0) {
                    (None, true) => 0,
                    (None, false) => len - 1,
                    (Some(i), true) => (i + 1) % len,
                    (Some(i), false) => (i + len - 1) % len,
                });
            }
            FieldKind::Text | FieldKind::Secret => {}
        }
    }

    /// What the field shows: masked for secrets, resolved for choices.
    pub(crate) fn display_value(&self, index: usize) -> String {
        let Some(field) = self.fields.get(index) else {
            return String::new();
        };
        match field.kind {
            FieldKind::Text => field.value.clone(),
            FieldKind::Secret => "•".repeat(field.value.chars().count()),
            FieldKind::Direction => format!("< {} >", self.direction),
            FieldKind::Category => match self.category.and_then(|i| self.categories.get(i)) {
                Some((_, name)) => format!("< {name} >"),
                None if self.categories.is_empty() => "No categories yet".into(),
                None => "< Select a category >".into(),
            },
        }
    }

    fn value(&self, label: &str) -> String {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    pub(crate) fn as_login(&self) -> LoginForm {
        LoginForm {
            email: self.value("Email"),
            password: self.value("Password"),
        }
    }

    pub(crate) fn as_register(&self) -> RegisterForm {
        RegisterForm {
            name: self.value("Name"),
            email: self.value("Email"),
            password: self.value("Password"),
        }
    }

    pub(crate) fn as_category(&self) -> CategoryForm {
        CategoryForm {
            name: self.value("Name"),
            description: self.value("Description"),
        }
    }

    pub(crate) fn as_transaction(&self) -> TransactionForm {
        TransactionForm {
            date: self.value("Date"),
            amount: self.value("Amount"),
            direction: self.direction,
            description: self.value("Description"),
            category_id: self
                .category
                .and_then(|i| self.categories.get(i))
                .map(|(id, _)| *id),
        }
    }
}
