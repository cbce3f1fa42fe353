//! Static question tables, one ordered sequence per category.
//!
//! Order defines wizard step order. Option values are the tokens the rule
//! tables in [`crate::engine`] match against.

use crate::{Category, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    EncryptionScope,
    HasBackups,
    NetworkIsolated,
    RansomNote,
    AdditionalInfo,
    ClickedLink,
    CredentialsEntered,
    AttachmentOpened,
    MfaEnabled,
    DataType,
    DataVolume,
    BreachVector,
    MalwareDetected,
    MalwareActive,
    ServiceStatus,
    AttackDuration,
    AccessMethod,
    AccessOngoing,
}

impl QuestionId {
    pub const ALL: [QuestionId; 18] = [
        QuestionId::EncryptionScope,
        QuestionId::HasBackups,
        QuestionId::NetworkIsolated,
        QuestionId::RansomNote,
        QuestionId::AdditionalInfo,
        QuestionId::ClickedLink,
        QuestionId::CredentialsEntered,
        QuestionId::AttachmentOpened,
        QuestionId::MfaEnabled,
        QuestionId::DataType,
        QuestionId::DataVolume,
        QuestionId::BreachVector,
        QuestionId::MalwareDetected,
        QuestionId::MalwareActive,
        QuestionId::ServiceStatus,
        QuestionId::AttackDuration,
        QuestionId::AccessMethod,
        QuestionId::AccessOngoing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionId::EncryptionScope => "encryption_scope",
            QuestionId::HasBackups => "has_backups",
            QuestionId::NetworkIsolated => "network_isolated",
            QuestionId::RansomNote => "ransom_note",
            QuestionId::AdditionalInfo => "additional_info",
            QuestionId::ClickedLink => "clicked_link",
            QuestionId::CredentialsEntered => "credentials_entered",
            QuestionId::AttachmentOpened => "attachment_opened",
            QuestionId::MfaEnabled => "mfa_enabled",
            QuestionId::DataType => "data_type",
            QuestionId::DataVolume => "data_volume",
            QuestionId::BreachVector => "breach_vector",
            QuestionId::MalwareDetected => "malware_detected",
            QuestionId::MalwareActive => "malware_active",
            QuestionId::ServiceStatus => "service_status",
            QuestionId::AttackDuration => "attack_duration",
            QuestionId::AccessMethod => "access_method",
            QuestionId::AccessOngoing => "access_ongoing",
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionId {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        QuestionId::ALL
            .into_iter()
            .find(|id| id.as_str() == value.trim())
            .ok_or_else(|| ParseError::Question(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Single,
    Multiple,
    Text,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AnswerOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub title: &'static str,
    pub description: Option<&'static str>,
    pub placeholder: Option<&'static str>,
    pub kind: QuestionKind,
    pub options: &'static [AnswerOption],
}

impl Question {
    pub fn option(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.value == value)
    }

    pub fn label_for(&self, value: &str) -> Option<&'static str> {
        self.option(value).map(|option| option.label)
    }
}

pub fn questions_for(category: Category) -> &'static [Question] {
    match category {
        Category::Ransomware => RANSOMWARE,
        Category::Phishing => PHISHING,
        Category::DataBreach => DATA_BREACH,
        Category::Malware => MALWARE,
        Category::Ddos => DDOS,
        Category::UnauthorizedAccess => UNAUTHORIZED_ACCESS,
    }
}

/// Raw-tag lookup; an unrecognized tag yields an empty sequence.
pub fn questions_for_tag(tag: &str) -> &'static [Question] {
    tag.parse::<Category>().map(questions_for).unwrap_or(&[])
}

pub fn find_question(category: Category, id: QuestionId) -> Option<&'static Question> {
    questions_for(category).iter().find(|question| question.id == id)
}

const fn opt(value: &'static str, label: &'static str) -> AnswerOption {
    AnswerOption { value, label }
}

static RANSOMWARE: &[Question] = &[
    Question {
        id: QuestionId::EncryptionScope,
        title: "¿Cuál es el alcance de la encriptación?",
        description: Some("Selecciona la opción que mejor describe el alcance del ataque"),
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("single_device", "Un único dispositivo"),
            opt("multiple_systems", "Múltiples sistemas (2-10)"),
            opt("critical_systems", "Sistemas críticos del negocio"),
            opt("entire_network", "Toda la red empresarial"),
        ],
    },
    Question {
        id: QuestionId::HasBackups,
        title: "¿Tienes copias de seguridad de los datos afectados?",
        description: Some("Las copias de seguridad son fundamentales para la recuperación"),
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("yes_recent", "Sí, tengo backups recientes (menos de 24h)"),
            opt("yes_old", "Sí, pero son antiguos (más de 24h)"),
            opt("no", "No tengo copias de seguridad"),
            opt("unknown", "No estoy seguro"),
        ],
    },
    Question {
        id: QuestionId::NetworkIsolated,
        title: "¿Los sistemas afectados ya están aislados de la red?",
        description: None,
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("yes", "Sí, ya están aislados"),
            opt("no", "No, aún están conectados"),
            opt("partial", "Parcialmente aislados"),
        ],
    },
    Question {
        id: QuestionId::RansomNote,
        title: "¿Has documentado la nota de rescate?",
        description: Some(
            "La nota de rescate contiene información valiosa para identificar la variante",
        ),
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("yes", "Sí, tengo fotos/capturas"),
            opt("no", "No, no la he documentado"),
        ],
    },
    Question {
        id: QuestionId::AdditionalInfo,
        title: "Información adicional (opcional)",
        description: Some("Describe cualquier detalle adicional que consideres relevante"),
        placeholder: Some(
            "Ej: Cómo se detectó el incidente, extensiones de archivos encriptados, etc.",
        ),
        kind: QuestionKind::Text,
        options: &[],
    },
];

static PHISHING: &[Question] = &[
    Question {
        id: QuestionId::ClickedLink,
        title: "¿Se hizo clic en el enlace del correo sospechoso?",
        description: None,
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("yes", "Sí, se hizo clic en el enlace"),
            opt("no", "No, no se hizo clic"),
        ],
    },
    Question {
        id: QuestionId::CredentialsEntered,
        title: "¿Se introdujeron credenciales en algún formulario?",
        description: None,
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("yes", "Sí, se introdujeron credenciales"),
            opt("no", "No se introdujeron credenciales"),
            opt("unknown", "No estoy seguro"),
        ],
    },
    Question {
        id: QuestionId::AttachmentOpened,
        title: "¿Se abrió algún archivo adjunto?",
        description: None,
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("yes", "Sí, se abrió un adjunto"),
            opt("no", "No había adjuntos o no se abrieron"),
        ],
    },
    Question {
        id: QuestionId::MfaEnabled,
        title: "¿Las cuentas afectadas tienen autenticación multifactor (MFA)?",
        description: None,
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("yes", "Sí, tienen MFA activo"),
            opt("no", "No tienen MFA"),
        ],
    },
];

static DATA_BREACH: &[Question] = &[
    Question {
        id: QuestionId::DataType,
        title: "¿Qué tipo de datos fueron comprometidos?",
        description: Some("Puedes seleccionar múltiples opciones"),
        placeholder: None,
        kind: QuestionKind::Multiple,
        options: &[
            opt("pii", "Datos personales (PII - nombres, direcciones, etc.)"),
            opt("financial", "Datos financieros (tarjetas, cuentas bancarias)"),
            opt("health", "Datos de salud"),
            opt("credentials", "Credenciales de acceso"),
            opt("corporate", "Datos corporativos confidenciales"),
            opt("other", "Otros"),
        ],
    },
    Question {
        id: QuestionId::DataVolume,
        title: "¿Cuántos registros fueron afectados aproximadamente?",
        description: None,
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("low", "Menos de 100 registros"),
            opt("medium", "100 - 10,000 registros"),
            opt("high", "10,000 - 100,000 registros"),
            opt("massive", "Más de 100,000 registros"),
            opt("unknown", "No determinado aún"),
        ],
    },
    Question {
        id: QuestionId::BreachVector,
        title: "¿Cómo ocurrió la brecha?",
        description: None,
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("external_attack", "Ataque externo (hacking)"),
            opt("insider", "Amenaza interna (empleado)"),
            opt("misconfiguration", "Error de configuración"),
            opt("lost_device", "Dispositivo perdido/robado"),
            opt("third_party", "Proveedor tercero"),
            opt("unknown", "Aún bajo investigación"),
        ],
    },
];

static MALWARE: &[Question] = &[
    Question {
        id: QuestionId::MalwareDetected,
        title: "¿Cómo se detectó el malware?",
        description: None,
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("antivirus", "Alerta de antivirus/EDR"),
            opt("behavior", "Comportamiento anómalo del sistema"),
            opt("network", "Anomalía en tráfico de red"),
            opt("user_report", "Reporte de usuario"),
        ],
    },
    Question {
        id: QuestionId::MalwareActive,
        title: "¿El malware sigue activo?",
        description: None,
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("yes", "Sí, aún está activo"),
            opt("no", "Ya fue contenido/eliminado"),
            opt("unknown", "No estoy seguro"),
        ],
    },
];

static DDOS: &[Question] = &[
    Question {
        id: QuestionId::ServiceStatus,
        title: "¿Cuál es el estado actual de los servicios?",
        description: None,
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("down", "Completamente caídos"),
            opt("degraded", "Funcionando con degradación"),
            opt("recovering", "En proceso de recuperación"),
        ],
    },
    Question {
        id: QuestionId::AttackDuration,
        title: "¿Cuánto tiempo lleva el ataque?",
        description: None,
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("minutes", "Minutos"),
            opt("hours", "Horas"),
            opt("days", "Días"),
        ],
    },
];

static UNAUTHORIZED_ACCESS: &[Question] = &[
    Question {
        id: QuestionId::AccessMethod,
        title: "¿Cómo se obtuvo el acceso no autorizado?",
        description: None,
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("stolen_credentials", "Credenciales robadas"),
            opt("vulnerability", "Explotación de vulnerabilidad"),
            opt("social_engineering", "Ingeniería social"),
            opt("insider", "Amenaza interna"),
            opt("unknown", "Bajo investigación"),
        ],
    },
    Question {
        id: QuestionId::AccessOngoing,
        title: "¿El acceso no autorizado sigue activo?",
        description: None,
        placeholder: None,
        kind: QuestionKind::Single,
        options: &[
            opt("yes", "Sí, aún tiene acceso"),
            opt("no", "Ya fue revocado"),
            opt("unknown", "No estoy seguro"),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_questions_in_stable_order() {
        for category in Category::ALL {
            let first = questions_for(category);
            let second = questions_for(category);
            assert!(!first.is_empty());
            let ids: Vec<_> = first.iter().map(|question| question.id).collect();
            let again: Vec<_> = second.iter().map(|question| question.id).collect();
            assert_eq!(ids, again);
        }
        let ids: Vec<_> = questions_for(Category::Ransomware)
            .iter()
            .map(|question| question.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                QuestionId::EncryptionScope,
                QuestionId::HasBackups,
                QuestionId::NetworkIsolated,
                QuestionId::RansomNote,
                QuestionId::AdditionalInfo,
            ]
        );
    }

    #[test]
    fn unknown_tag_yields_no_questions() {
        assert!(questions_for_tag("insider-threat").is_empty());
        assert!(questions_for_tag("").is_empty());
        assert_eq!(questions_for_tag("ddos").len(), 2);
    }

    #[test]
    fn ids_are_unique_within_category() {
        for category in Category::ALL {
            let questions = questions_for(category);
            for (idx, question) in questions.iter().enumerate() {
                assert!(questions[idx + 1..]
                    .iter()
                    .all(|other| other.id != question.id));
            }
        }
    }

    #[test]
    fn choice_questions_have_options_and_text_questions_do_not() {
        for category in Category::ALL {
            for question in questions_for(category) {
                match question.kind {
                    QuestionKind::Text => assert!(question.options.is_empty()),
                    _ => assert!(!question.options.is_empty(), "{}", question.id),
                }
            }
        }
    }

    #[test]
    fn question_id_parses_from_wire_name() {
        for id in QuestionId::ALL {
            assert_eq!(id.as_str().parse::<QuestionId>().expect("parse"), id);
        }
        assert!("scope".parse::<QuestionId>().is_err());
        let question = find_question(Category::DataBreach, QuestionId::DataType).expect("question");
        assert_eq!(question.kind, QuestionKind::Multiple);
        assert_eq!(question.label_for("health"), Some("Datos de salud"));
        assert!(find_question(Category::Ddos, QuestionId::DataType).is_none());
    }
}
