use std::collections::HashSet;

/// Category codes classified as high-impact
pub const HIGH_RISK_CATEGORY_CODES: [&str; 13] = [
    "10100", "10500", "10600", "05309", "05305", "05900", "06000", "08802", "03801", "03802",
    "02202", "05004", "04201",
];

/// Criteria text shown next to the high-risk filter
pub const HIGH_RISK_CRITERIA: &str = "เกณฑ์การจัดให้เป็นโรงงานระดับความเสี่ยงสูง คือ อาจก่อผลกระทบอย่างรุนแรงในวงกว้าง และเมื่อมีผลกระทบแล้วยากต่อการฟื้นฟูให้กลับสู่สภาพปกติ โดยกลุ่มภาคประชาชนชาวปราจีนบุรี";

/// Membership test against the built-in high-risk category list
#[inline]
pub fn is_high_risk(category_code: &str) -> bool {
    HIGH_RISK_CATEGORY_CODES.contains(&category_code)
}

/// Static set of high-risk category codes
///
/// Built from configuration at startup, never from the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskClassifier {
    codes: HashSet<String>,
}

impl RiskClassifier {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn is_high_risk(&self, category_code: &str) -> bool {
        self.codes.contains(category_code)
    }

    /// Codes in ascending order
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.codes.iter().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new(HIGH_RISK_CATEGORY_CODES)
    }
}
