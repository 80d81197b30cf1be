use serde::Serialize;

use crate::ledger::EntryKind;

/// Where an expense category lands on the Form 5 business tax return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Form5Section {
    Revenue,
    /// Deducted in personal taxation, reported outside the business result.
    PensionPremiums,
    OtherExpenses,
    /// Depreciable equipment; split between depreciation and other expenses
    /// by the depreciation policy.
    Equipment,
}

/// A compiled-in bookkeeping category for a solo practitioner doctor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub label: &'static str,
    pub label_fi: &'static str,
    pub kind: EntryKind,
    /// Kirjanpitolaki requires a supporting document (tosite).
    pub requires_proof: bool,
    pub depreciable: bool,
    pub form5_section: Form5Section,
}

/// Category id of the YEL pension insurance premium.
pub const PENSION_CATEGORY: &str = "yel";

/// Category id of equipment purchases.
pub const EQUIPMENT_CATEGORY: &str = "laitteet";

const fn income(id: &'static str, label: &'static str, label_fi: &'static str) -> Category {
    Category {
        id,
        label,
        label_fi,
        kind: EntryKind::Income,
        requires_proof: true,
        depreciable: false,
        form5_section: Form5Section::Revenue,
    }
}

const fn expense(id: &'static str, label: &'static str, label_fi: &'static str) -> Category {
    Category {
        id,
        label,
        label_fi,
        kind: EntryKind::Expense,
        requires_proof: true,
        depreciable: false,
        form5_section: Form5Section::OtherExpenses,
    }
}

pub static CATEGORIES: [Category; 16] = [
    income("clinic_income", "Clinic Income", "Klinikan tilitys"),
    income("other_income", "Other Income", "Muu tulo"),
    Category {
        form5_section: Form5Section::PensionPremiums,
        ..expense(PENSION_CATEGORY, "YEL Insurance", "YEL-vakuutus")
    },
    expense("potilasvakuutus", "Patient Insurance", "Potilasvakuutus"),
    expense("laakariliitto", "Medical Association", "Laakariliitto"),
    // Flat deduction, no receipt exists.
    Category {
        requires_proof: false,
        ..expense("tyohuonevahennys", "Home Office Deduction", "Tyohuonevahennys")
    },
    expense("matkakulut", "Travel Expenses", "Matkakulut"),
    expense("taydennyskoulutus", "Continuing Education", "Taydennyskoulutus"),
    expense("ammattikirjallisuus", "Professional Literature", "Ammattikirjallisuus"),
    Category {
        depreciable: true,
        form5_section: Form5Section::Equipment,
        ..expense(EQUIPMENT_CATEGORY, "Equipment", "Laitteet ja tarvikkeet")
    },
    expense("tyovaatteet", "Work Clothing", "Tyovaatteet"),
    expense("puhelin_netti", "Phone & Internet", "Puhelin ja netti"),
    expense("tilitoimisto", "Accounting Fees", "Tilitoimisto"),
    expense("vakuutukset", "Other Insurance", "Muut vakuutukset"),
    expense("toimistotarvikkeet", "Office Supplies", "Toimistotarvikkeet"),
    expense("muut_kulut", "Other Expenses", "Muut kulut"),
];

pub fn category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

pub fn categories_by_kind(kind: EntryKind) -> impl Iterator<Item = &'static Category> {
    CATEGORIES.iter().filter(move |c| c.kind == kind)
}

/// Form 5 section for a category id. Unknown ids fall back to other expenses.
pub fn form5_section(id: &str) -> Form5Section {
    category(id)
        .map(|c| c.form5_section)
        .unwrap_or(Form5Section::OtherExpenses)
}

/// Unknown ids are treated as requiring proof.
pub fn requires_proof(id: &str) -> bool {
    category(id).map(|c| c.requires_proof).unwrap_or(true)
}

pub fn is_depreciable(id: &str) -> bool {
    category(id).map(|c| c.depreciable).unwrap_or(false)
}
