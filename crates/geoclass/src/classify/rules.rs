//! Ordered decision tables.
//!
//! Each classifier expresses its decision tree as a list of
//! `(predicate, outcome)` rules evaluated top to bottom. The first rule whose
//! predicate holds wins, so overlapping conditions resolve by position and
//! the order can be read straight from the table.

/// One row of a decision table.
pub struct Rule<I, O> {
    /// Short label naming the condition, e.g. `"A-1-a"` or `"ll < 50, below A-line"`.
    pub label: &'static str,
    /// Condition on the classifier input.
    pub when: fn(&I) -> bool,
    /// Outcome when the condition holds.
    pub then: O,
}

impl<I, O> Rule<I, O> {
    /// Create a rule.
    pub fn new(label: &'static str, when: fn(&I) -> bool, then: O) -> Self {
        Self { label, when, then }
    }
}

/// An ordered, first-match-wins list of rules.
pub struct DecisionTable<I, O> {
    name: &'static str,
    rules: Vec<Rule<I, O>>,
}

impl<I, O> DecisionTable<I, O> {
    /// Create a table from rules in priority order.
    pub fn new(name: &'static str, rules: Vec<Rule<I, O>>) -> Self {
        Self { name, rules }
    }

    /// Table name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule<I, O>] {
        &self.rules
    }

    /// First rule whose predicate holds for `input`.
    pub fn first_match(&self, input: &I) -> Option<&Rule<I, O>> {
        self.rules.iter().find(|rule| (rule.when)(input))
    }

    /// Labels of every rule that holds for `input`, in order.
    ///
    /// Useful when auditing overlaps: the first entry is the one that won.
    pub fn matching_labels(&self, input: &I) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| (rule.when)(input))
            .map(|rule| rule.label)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_table() -> DecisionTable<i32, &'static str> {
        DecisionTable::new(
            "sign",
            vec![
                Rule::new("negative", |x: &i32| *x < 0, "neg"),
                Rule::new("small", |x: &i32| *x < 10, "small"),
                Rule::new("any", |_: &i32| true, "large"),
            ],
        )
    }

    #[test]
    fn test_first_match_wins() {
        let table = sign_table();
        assert_eq!(table.first_match(&-3).map(|r| r.then), Some("neg"));
        assert_eq!(table.first_match(&3).map(|r| r.then), Some("small"));
        assert_eq!(table.first_match(&30).map(|r| r.then), Some("large"));
    }

    #[test]
    fn test_matching_labels_lists_overlaps() {
        let table = sign_table();
        assert_eq!(table.matching_labels(&-3), vec!["negative", "small", "any"]);
        assert_eq!(table.name(), "sign");
        assert_eq!(table.rules().len(), 3);
    }
}
