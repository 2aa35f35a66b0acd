//! Display labels for phone, email and postal subtype codes.

use crate::db::columns::{email, phone, postal, TYPE_CUSTOM};

/// The kinds of labelled values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Phone,
    Email,
    Postal,
}

const FALLBACK_LABEL: &str = "other";

const PHONE_LABELS: &[(i64, &str)] = &[
    (phone::HOME, "home"),
    (phone::WORK, "work"),
    (phone::MOBILE, "mobile"),
    (phone::FAX_WORK, "fax work"),
    (phone::FAX_HOME, "fax home"),
    (phone::MAIN, "main"),
    (phone::COMPANY_MAIN, "company"),
    (phone::PAGER, "pager"),
];

const EMAIL_LABELS: &[(i64, &str)] = &[
    (email::HOME, "home"),
    (email::WORK, "work"),
    (email::MOBILE, "mobile"),
];

const POSTAL_LABELS: &[(i64, &str)] = &[(postal::HOME, "home"), (postal::WORK, "work")];

impl LabelKind {
    fn fixed_table(self) -> &'static [(i64, &'static str)] {
        match self {
            LabelKind::Phone => PHONE_LABELS,
            LabelKind::Email => EMAIL_LABELS,
            LabelKind::Postal => POSTAL_LABELS,
        }
    }

    /// Postal custom labels are kept as the user typed them.
    fn lowercases_custom(self) -> bool {
        !matches!(self, LabelKind::Postal)
    }
}

/// Locale-aware label lookup supplied by the platform.
pub trait LabelService: Send + Sync {
    /// Label for `code`. `custom_label` is the row's free-text label, or `""`.
    fn type_label(&self, kind: LabelKind, code: i64, custom_label: &str) -> String;
}

/// How a label is produced.
#[derive(Clone, Copy)]
pub enum LabelMode<'a> {
    Fixed,
    Localized(&'a dyn LabelService),
}

impl<'a> LabelMode<'a> {
    /// Localized only when asked for and a service is installed.
    pub fn select(localized: bool, service: Option<&'a dyn LabelService>) -> Self {
        match (localized, service) {
            (true, Some(service)) => LabelMode::Localized(service),
            _ => LabelMode::Fixed,
        }
    }
}

/// Resolve the display label of a labelled value. The row's free-text
/// label is only used by the fixed tables.
pub fn resolve(kind: LabelKind, code: i64, raw_label: Option<&str>, mode: LabelMode<'_>) -> String {
    match mode {
        LabelMode::Fixed => fixed_label(kind, code, raw_label),
        LabelMode::Localized(service) => service
            .type_label(kind, code, "")
            .to_lowercase(),
    }
}

/// The built-in table lookup.
pub fn fixed_label(kind: LabelKind, code: i64, raw_label: Option<&str>) -> String {
    if code == TYPE_CUSTOM {
        let label = raw_label.unwrap_or_default();
        return if kind.lowercases_custom() {
            label.to_lowercase()
        } else {
            label.to_string()
        };
    }

    kind.fixed_table()
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .unwrap_or(FALLBACK_LABEL)
        .to_string()
}

/// The provider's stock English type labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct StockLabels;

const STOCK_PHONE: &[(i64, &str)] = &[
    (phone::HOME, "Home"),
    (phone::MOBILE, "Mobile"),
    (phone::WORK, "Work"),
    (phone::FAX_WORK, "Work Fax"),
    (phone::FAX_HOME, "Home Fax"),
    (phone::PAGER, "Pager"),
    (phone::OTHER, "Other"),
    (phone::CALLBACK, "Callback"),
    (phone::CAR, "Car"),
    (phone::COMPANY_MAIN, "Company Main"),
    (phone::ISDN, "ISDN"),
    (phone::MAIN, "Main"),
    (phone::OTHER_FAX, "Other Fax"),
    (phone::RADIO, "Radio"),
    (phone::TELEX, "Telex"),
    (phone::TTY_TDD, "TTY TDD"),
    (phone::WORK_MOBILE, "Work Mobile"),
    (phone::WORK_PAGER, "Work Pager"),
    (phone::ASSISTANT, "Assistant"),
    (phone::MMS, "MMS"),
];

const STOCK_EMAIL: &[(i64, &str)] = &[
    (email::HOME, "Home"),
    (email::WORK, "Work"),
    (email::OTHER, "Other"),
    (email::MOBILE, "Mobile"),
];

const STOCK_POSTAL: &[(i64, &str)] = &[
    (postal::HOME, "Home"),
    (postal::WORK, "Work"),
    (postal::OTHER, "Other"),
];

const STOCK_CUSTOM: &str = "Custom";

impl LabelService for StockLabels {
    fn type_label(&self, kind: LabelKind, code: i64, custom_label: &str) -> String {
        if code == TYPE_CUSTOM && !custom_label.is_empty() {
            return custom_label.to_string();
        }
        let table = match kind {
            LabelKind::Phone => STOCK_PHONE,
            LabelKind::Email => STOCK_EMAIL,
            LabelKind::Postal => STOCK_POSTAL,
        };
        table
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
            .unwrap_or(STOCK_CUSTOM)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_phone_labels() {
        assert_eq!(fixed_label(LabelKind::Phone, phone::HOME, None), "home");
        assert_eq!(fixed_label(LabelKind::Phone, phone::FAX_WORK, None), "fax work");
        assert_eq!(fixed_label(LabelKind::Phone, phone::COMPANY_MAIN, None), "company");
    }

    #[test]
    fn fixed_unknown_code_is_other() {
        assert_eq!(fixed_label(LabelKind::Phone, phone::CAR, None), "other");
        assert_eq!(fixed_label(LabelKind::Email, email::OTHER, None), "other");
        assert_eq!(fixed_label(LabelKind::Postal, 99, None), "other");
    }

    #[test]
    fn fixed_custom_lowercases_phone_and_email() {
        assert_eq!(fixed_label(LabelKind::Phone, TYPE_CUSTOM, Some("Boat")), "boat");
        assert_eq!(fixed_label(LabelKind::Email, TYPE_CUSTOM, Some("School")), "school");
    }

    #[test]
    fn fixed_custom_postal_keeps_case() {
        assert_eq!(fixed_label(LabelKind::Postal, TYPE_CUSTOM, Some("Cabin")), "Cabin");
    }

    #[test]
    fn fixed_custom_without_label_is_empty() {
        assert_eq!(fixed_label(LabelKind::Phone, TYPE_CUSTOM, None), "");
        assert_eq!(fixed_label(LabelKind::Postal, TYPE_CUSTOM, None), "");
    }

    #[test]
    fn localized_lowercases_service_output() {
        let label = resolve(LabelKind::Phone, phone::WORK_MOBILE, None, LabelMode::Localized(&StockLabels));
        assert_eq!(label, "work mobile");
    }

    #[test]
    fn localized_custom_ignores_row_label() {
        let label = resolve(LabelKind::Postal, TYPE_CUSTOM, Some("Cabin"), LabelMode::Localized(&StockLabels));
        assert_eq!(label, "custom");
        let label = resolve(LabelKind::Phone, TYPE_CUSTOM, Some("Boat"), LabelMode::Localized(&StockLabels));
        assert_eq!(label, "custom");
    }

    #[test]
    fn localized_custom_without_label_is_custom() {
        let label = resolve(LabelKind::Email, TYPE_CUSTOM, None, LabelMode::Localized(&StockLabels));
        assert_eq!(label, "custom");
    }

    struct Shouting;

    impl LabelService for Shouting {
        fn type_label(&self, _kind: LabelKind, code: i64, _custom_label: &str) -> String {
            format!("TYPE {}", code)
        }
    }

    #[test]
    fn select_falls_back_to_fixed_without_service() {
        let label = resolve(LabelKind::Phone, phone::CAR, None, LabelMode::select(true, None));
        assert_eq!(label, "other");
        let label = resolve(LabelKind::Phone, phone::CAR, None, LabelMode::select(false, Some(&StockLabels)));
        assert_eq!(label, "other");
    }

    #[test]
    fn localized_delegates_to_service() {
        let label = resolve(LabelKind::Email, email::HOME, None, LabelMode::Localized(&Shouting));
        assert_eq!(label, "type 1");
    }
}
