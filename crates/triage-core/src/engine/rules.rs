//! Rule-table evaluation.
//!
//! Severity is folded in two phases: every matching `AtLeast` floor is
//! combined with `max`, then every matching `Escalate` raises one level.
//! Neither step can lower a level, so no rule ordering can downgrade a
//! severity set by a primary answer.

use crate::analysis::{Analysis, Section};
use crate::answers::AnswerSet;
use crate::catalog::QuestionId;
use crate::Severity;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Predicate {
    Always,
    /// Matches when no earlier rule of the same group matched.
    Fallback,
    Equals(QuestionId, &'static str),
    OneOf(QuestionId, &'static [&'static str]),
    ContainsAny(QuestionId, &'static [&'static str]),
}

impl Predicate {
    fn matches(self, answers: &AnswerSet) -> bool {
        match self {
            Predicate::Always | Predicate::Fallback => true,
            Predicate::Equals(id, value) => answers.single(id) == Some(value),
            Predicate::OneOf(id, values) => answers
                .single(id)
                .map(|answer| values.contains(&answer))
                .unwrap_or(false),
            Predicate::ContainsAny(id, values) => {
                values.iter().any(|value| answers.contains(id, value))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SeverityEffect {
    Keep,
    AtLeast(Severity),
    Escalate,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Rule {
    pub(crate) when: Predicate,
    pub(crate) group: Option<&'static str>,
    pub(crate) severity: SeverityEffect,
    pub(crate) clause: Option<&'static str>,
    pub(crate) append: &'static [(Section, &'static str)],
    pub(crate) replace: &'static [(Section, &'static [&'static str])],
}

impl Rule {
    pub(crate) const fn when(predicate: Predicate) -> Self {
        Self {
            when: predicate,
            group: None,
            severity: SeverityEffect::Keep,
            clause: None,
            append: &[],
            replace: &[],
        }
    }

    pub(crate) const fn group(mut self, group: &'static str) -> Self {
        self.group = Some(group);
        self
    }

    pub(crate) const fn severity(mut self, effect: SeverityEffect) -> Self {
        self.severity = effect;
        self
    }

    pub(crate) const fn clause(mut self, clause: &'static str) -> Self {
        self.clause = Some(clause);
        self
    }

    pub(crate) const fn append(mut self, items: &'static [(Section, &'static str)]) -> Self {
        self.append = items;
        self
    }

    pub(crate) const fn replace(
        mut self,
        sections: &'static [(Section, &'static [&'static str])],
    ) -> Self {
        self.replace = sections;
        self
    }
}

/// Base sentence with an optional `{}` slot filled from the primary answer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Narrative {
    pub(crate) template: &'static str,
    pub(crate) lookup: Option<Lookup>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Lookup {
    pub(crate) question: QuestionId,
    pub(crate) entries: &'static [(&'static str, &'static str)],
    pub(crate) fallback: &'static str,
}

impl Narrative {
    fn render(&self, answers: &AnswerSet) -> String {
        let Some(lookup) = self.lookup else {
            return self.template.to_string();
        };
        let text = answers
            .single(lookup.question)
            .and_then(|value| {
                lookup
                    .entries
                    .iter()
                    .find(|(key, _)| *key == value)
                    .map(|(_, text)| *text)
            })
            .unwrap_or(lookup.fallback);
        self.template.replacen("{}", text, 1)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RuleTable {
    pub(crate) base_severity: Severity,
    pub(crate) narrative: Narrative,
    pub(crate) rules: &'static [Rule],
    pub(crate) immediate: &'static [&'static str],
    pub(crate) containment: &'static [&'static str],
    pub(crate) recovery: &'static [&'static str],
    pub(crate) long_term: &'static [&'static str],
    pub(crate) resources: &'static [&'static str],
}

impl RuleTable {
    pub(crate) fn evaluate(&self, answers: &AnswerSet) -> Analysis {
        let mut matched_groups: Vec<&'static str> = Vec::new();
        let mut floor = self.base_severity;
        let mut escalations = 0usize;
        let mut clauses = Vec::new();
        let mut replacements = Vec::new();
        let mut insertions = Vec::new();

        for rule in self.rules {
            if let Some(group) = rule.group {
                if matched_groups.contains(&group) {
                    continue;
                }
            }
            if !rule.when.matches(answers) {
                continue;
            }
            if let Some(group) = rule.group {
                matched_groups.push(group);
            }
            match rule.severity {
                SeverityEffect::Keep => {}
                SeverityEffect::AtLeast(level) => floor = floor.max(level),
                SeverityEffect::Escalate => escalations += 1,
            }
            clauses.extend(rule.clause);
            replacements.extend(rule.replace.iter().copied());
            insertions.extend(rule.append.iter().copied());
        }

        let severity = (0..escalations).fold(floor, |level, _| level.escalate());

        let base = self.narrative.render(answers);
        let situation = std::iter::once(base.as_str())
            .chain(clauses)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let mut analysis = Analysis {
            severity,
            situation,
            immediate_actions: owned(self.immediate),
            containment: owned(self.containment),
            recovery: owned(self.recovery),
            long_term: owned(self.long_term),
            resources: owned(self.resources),
        };
        for (section, items) in replacements {
            *analysis.section_mut(section) = owned(items);
        }
        for (section, item) in insertions {
            analysis.section_mut(section).push(item.to_string());
        }
        analysis
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
