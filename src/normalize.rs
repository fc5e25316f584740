//! Turn the many spellings of a dish as they appear in point-of-sale exports into one canonical product name.

/// The marker a point-of-sale label carries if the item was sold as part of a combo.
pub const COMBO_MARKER: &str = "(套餐)";
/// The marker a point-of-sale label carries if the item was sold on its own.
pub const A_LA_CARTE_MARKER: &str = "(單點)";
/// A label containing this denotes the total of a single category for the day.
pub const CATEGORY_SUBTOTAL_MARKER: &str = "共計";
/// A label containing this denotes the total of the whole day.
pub const GRAND_TOTAL_MARKER: &str = "總計";

/// The canonical name of the extra noodle portion only students can order.
pub const STUDENT_EXTRA_NOODLE: &str = "學生加麵";
/// The canonical name of the regular extra noodle portion.
pub const EXTRA_NOODLE: &str = "加麵";

/// How an item was packaged when it was sold, as encoded in its raw label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Packaging {
    Combo,
    ALaCarte,
}

impl Packaging {
    /// Detect the packaging from the trailing marker of `raw_label`, or `None` if it carries no marker.
    ///
    /// This is the only place that decides about packaging, so statistics stay consistent with [`normalize()`].
    pub fn of(raw_label: &str) -> Option<Self> {
        let label = raw_label.trim_end();
        if label.ends_with(COMBO_MARKER) {
            Some(Packaging::Combo)
        } else if label.ends_with(A_LA_CARTE_MARKER) {
            Some(Packaging::ALaCarte)
        } else {
            None
        }
    }
}

/// Map `raw_label` to its canonical product name.
///
/// The packaging marker is removed, surrounding whitespace is trimmed and a handful of known aliases
/// are folded into one name. Empty input is returned as is.
pub fn normalize(raw_label: &str) -> String {
    if raw_label.is_empty() {
        return String::new();
    }
    let label = strip_packaging(raw_label);

    if label.contains("學生") && label.contains(EXTRA_NOODLE) {
        return STUDENT_EXTRA_NOODLE.into();
    }
    match label {
        "加麵" | "普通加麵" => EXTRA_NOODLE,
        "紅燒三寶" => "紅燒三寶麵",
        "川辣三寶" => "川辣三寶麵",
        "蕃茄三寶" => "蕃茄三寶麵",
        other => other,
    }
    .into()
}

fn strip_packaging(raw_label: &str) -> &str {
    let mut label = raw_label.trim();
    while let Some(stripped) = label
        .strip_suffix(COMBO_MARKER)
        .or_else(|| label.strip_suffix(A_LA_CARTE_MARKER))
    {
        label = stripped.trim();
    }
    label
}

/// Return `true` if the canonical `label` is the total of a whole business day.
pub fn is_grand_total_label(label: &str) -> bool {
    label.contains(GRAND_TOTAL_MARKER)
}

/// Return `true` if the canonical `label` is the subtotal of one category, which never is a grand total.
pub fn is_category_subtotal_label(label: &str) -> bool {
    label.contains(CATEGORY_SUBTOTAL_MARKER) && !is_grand_total_label(label)
}

/// Extract the category name from a subtotal `label` like `牛肉麵類共計`, or `None` if there is none.
pub fn subtotal_category(label: &str) -> Option<&str> {
    if !is_category_subtotal_label(label) {
        return None;
    }
    label
        .rfind(CATEGORY_SUBTOTAL_MARKER)
        .map(|pos| label[..pos].trim())
        .filter(|category| !category.is_empty())
}

/// Replace every run of whitespace in `label` with a single space and trim both ends.
pub fn collapse_whitespace(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}
