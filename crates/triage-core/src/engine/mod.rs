//! Answer-driven classification.
//!
//! Each category owns an independent [`rules::RuleTable`]; `analyze` is a
//! pure function of its inputs and never fails.

mod rules;
mod tables;

use crate::analysis::Analysis;
use crate::answers::AnswerSet;
use crate::Category;

pub fn analyze(category: Category, answers: &AnswerSet) -> Analysis {
    let table = match category {
        Category::Ransomware => &tables::RANSOMWARE,
        Category::Phishing => &tables::PHISHING,
        Category::DataBreach => &tables::DATA_BREACH,
        Category::Malware => &tables::MALWARE,
        Category::Ddos => &tables::DDOS,
        Category::UnauthorizedAccess => &tables::UNAUTHORIZED_ACCESS,
    };
    table.evaluate(answers)
}

/// Raw-tag entry point; an unrecognized tag gets the generic analysis.
pub fn analyze_tag(tag: &str, answers: &AnswerSet) -> Analysis {
    match tag.parse::<Category>() {
        Ok(category) => analyze(category, answers),
        Err(_) => {
            tracing::debug!(tag, "unrecognized category, using default analysis");
            default_analysis()
        }
    }
}

pub fn default_analysis() -> Analysis {
    tables::DEFAULT.evaluate(&AnswerSet::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestionId;
    use crate::Severity;

    fn ransomware(scope: &str, backups: &str) -> Analysis {
        let mut answers = AnswerSet::new();
        answers.set_single(QuestionId::EncryptionScope, scope);
        answers.set_single(QuestionId::HasBackups, backups);
        analyze(Category::Ransomware, &answers)
    }

    fn breach(types: &[&str]) -> Analysis {
        let mut answers = AnswerSet::new();
        answers.set_multiple(QuestionId::DataType, types.iter().copied());
        analyze(Category::DataBreach, &answers)
    }

    #[test]
    fn empty_answers_yield_complete_analysis_for_every_category() {
        let empty = AnswerSet::new();
        for category in Category::ALL {
            let analysis = analyze(category, &empty);
            assert!(!analysis.situation.is_empty(), "{category}");
            assert!(!analysis.immediate_actions.is_empty(), "{category}");
            assert!(!analysis.containment.is_empty(), "{category}");
            assert!(!analysis.recovery.is_empty(), "{category}");
            assert!(!analysis.long_term.is_empty(), "{category}");
            assert!(!analysis.resources.is_empty(), "{category}");
        }
    }

    #[test]
    fn severity_for_every_category_without_answers() {
        let empty = AnswerSet::new();
        let cases = [
            // missing backups answer escalates the medium base
            (Category::Ransomware, Severity::High),
            (Category::Phishing, Severity::Low),
            (Category::DataBreach, Severity::High),
            (Category::Malware, Severity::High),
            (Category::Ddos, Severity::High),
            (Category::UnauthorizedAccess, Severity::Critical),
        ];
        for (category, expected) in cases {
            assert_eq!(analyze(category, &empty).severity, expected, "{category}");
        }
        assert_eq!(default_analysis().severity, Severity::Medium);
        assert_eq!(analyze_tag("insider", &empty).severity, Severity::Medium);
    }

    #[test]
    fn phishing_unknown_credentials_without_click_stays_low() {
        let mut answers = AnswerSet::new();
        answers.set_single(QuestionId::CredentialsEntered, "unknown");
        answers.set_single(QuestionId::ClickedLink, "no");
        assert_eq!(analyze(Category::Phishing, &answers).severity, Severity::Low);
    }

    #[test]
    fn ransomware_scope_dominates_recent_backups() {
        let analysis = ransomware("entire_network", "yes_recent");
        assert_eq!(analysis.severity, Severity::Critical);
        assert_eq!(
            analysis.recovery.first().map(String::as_str),
            Some("Verificar la integridad de las copias de seguridad")
        );
        let without_backups = ransomware("entire_network", "no");
        assert_eq!(without_backups.severity, Severity::Critical);
        assert_ne!(analysis.recovery, without_backups.recovery);
    }

    #[test]
    fn ransomware_missing_backups_escalate_one_level() {
        assert_eq!(ransomware("single_device", "no").severity, Severity::High);
        assert_eq!(ransomware("multiple_systems", "no").severity, Severity::Critical);
        assert_eq!(ransomware("multiple_systems", "yes_old").severity, Severity::High);
        assert_eq!(ransomware("single_device", "yes_recent").severity, Severity::Medium);
        // "unknown" is not a backup answer the rules recognise.
        assert_eq!(ransomware("single_device", "unknown").severity, Severity::High);
    }

    #[test]
    fn ransomware_wide_scope_adds_executive_actions() {
        let wide = ransomware("critical_systems", "yes_recent");
        let narrow = ransomware("single_device", "yes_recent");
        assert_eq!(wide.immediate_actions.len(), narrow.immediate_actions.len() + 2);
        assert_eq!(
            wide.immediate_actions.last().map(String::as_str),
            Some("Notificar a la dirección ejecutiva")
        );
    }

    #[test]
    fn ransomware_connected_network_adds_segmentation() {
        let mut answers = AnswerSet::new();
        answers.set_single(QuestionId::NetworkIsolated, "no");
        let analysis = analyze(Category::Ransomware, &answers);
        assert_eq!(
            analysis.containment.last().map(String::as_str),
            Some("URGENTE: Segmentar la red inmediatamente")
        );
        answers.set_single(QuestionId::NetworkIsolated, "partial");
        let analysis = analyze(Category::Ransomware, &answers);
        assert_eq!(analysis.containment.len(), 6);
    }

    #[test]
    fn ransomware_narrative_composes_scope_and_backup_clauses() {
        let analysis = ransomware("entire_network", "yes_old");
        assert_eq!(
            analysis.situation,
            "Has identificado un incidente de ransomware que ha afectado a toda la red. \
             Cuentas con copias de seguridad, aunque no son recientes."
        );
        let unknown = ransomware("mainframe", "yes_old");
        assert!(unknown.situation.contains("sistemas de tu organización"));
        assert_eq!(unknown.severity, Severity::Medium);
    }

    #[test]
    fn data_breach_membership_triggers() {
        assert_eq!(breach(&["health"]).severity, Severity::High);
        assert_eq!(breach(&["pii", "health"]).severity, Severity::Critical);
        assert_eq!(breach(&["corporate", "financial"]).severity, Severity::Critical);
        assert!(breach(&["health", "pii"]).situation.contains("(PII)"));
        assert!(!breach(&["financial"]).situation.contains("(PII)"));
    }

    #[test]
    fn phishing_is_a_flat_three_way_decision() {
        let mut answers = AnswerSet::new();
        assert_eq!(analyze(Category::Phishing, &answers).severity, Severity::Low);

        answers.set_single(QuestionId::ClickedLink, "yes");
        let clicked = analyze(Category::Phishing, &answers);
        assert_eq!(clicked.severity, Severity::Medium);
        assert_eq!(clicked.immediate_actions.len(), 5);

        answers.set_single(QuestionId::CredentialsEntered, "yes");
        let compromised = analyze(Category::Phishing, &answers);
        assert_eq!(compromised.severity, Severity::High);
        assert!(compromised.situation.contains("credenciales fueron comprometidas"));
        assert_eq!(compromised.immediate_actions.len(), 6);
    }

    #[test]
    fn fixed_classifiers_ignore_answers() {
        let mut answers = AnswerSet::new();
        answers.set_single(QuestionId::MalwareActive, "yes");
        assert_eq!(analyze(Category::Malware, &answers).severity, Severity::High);
        assert_eq!(analyze(Category::Ddos, &answers).severity, Severity::High);
        assert_eq!(
            analyze(Category::UnauthorizedAccess, &answers).severity,
            Severity::Critical
        );
    }

    #[test]
    fn unrecognized_tag_degrades_to_default() {
        let analysis = analyze_tag("insider-threat", &AnswerSet::new());
        assert_eq!(analysis, default_analysis());
        assert_eq!(analysis.severity, Severity::Medium);
        assert_eq!(
            analyze_tag("ddos", &AnswerSet::new()),
            analyze(Category::Ddos, &AnswerSet::new())
        );
    }

    #[test]
    fn analysis_is_idempotent() {
        let mut answers = AnswerSet::new();
        answers.set_single(QuestionId::EncryptionScope, "multiple_systems");
        answers.set_single(QuestionId::NetworkIsolated, "no");
        answers.set_text(QuestionId::AdditionalInfo, "extension .locked");
        for category in Category::ALL {
            assert_eq!(analyze(category, &answers), analyze(category, &answers));
        }
    }
}
