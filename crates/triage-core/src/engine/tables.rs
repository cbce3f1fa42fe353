use super::rules::{Lookup, Narrative, Predicate, Rule, RuleTable, SeverityEffect};
use crate::analysis::Section;
use crate::catalog::QuestionId;
use crate::Severity;

pub(super) const RANSOMWARE: RuleTable = RuleTable {
    base_severity: Severity::Medium,
    narrative: Narrative {
        template: "Has identificado un incidente de ransomware que ha afectado a {}.",
        lookup: Some(Lookup {
            question: QuestionId::EncryptionScope,
            entries: &[
                ("single_device", "un único dispositivo"),
                ("multiple_systems", "múltiples sistemas"),
                ("critical_systems", "sistemas críticos"),
                ("entire_network", "toda la red"),
            ],
            fallback: "sistemas de tu organización",
        }),
    },
    rules: &[
        Rule::when(Predicate::OneOf(
            QuestionId::EncryptionScope,
            &["entire_network", "critical_systems"],
        ))
        .group("scope")
        .severity(SeverityEffect::AtLeast(Severity::Critical))
        .append(&[
            (Section::Immediate, "Activar el plan de continuidad de negocio"),
            (Section::Immediate, "Notificar a la dirección ejecutiva"),
        ]),
        Rule::when(Predicate::Equals(QuestionId::EncryptionScope, "multiple_systems"))
            .group("scope")
            .severity(SeverityEffect::AtLeast(Severity::High)),
        Rule::when(Predicate::Equals(QuestionId::HasBackups, "yes_recent"))
            .group("backups")
            .clause(
                "Afortunadamente, cuentas con copias de seguridad recientes que facilitarán la recuperación.",
            )
            .replace(&[(Section::Recovery, RANSOMWARE_RESTORE)]),
        Rule::when(Predicate::Equals(QuestionId::HasBackups, "yes_old"))
            .group("backups")
            .clause("Cuentas con copias de seguridad, aunque no son recientes.")
            .replace(&[(Section::Recovery, RANSOMWARE_RESTORE)]),
        Rule::when(Predicate::Fallback)
            .group("backups")
            .severity(SeverityEffect::Escalate)
            .clause(
                "No dispones de copias de seguridad, lo que complica significativamente la recuperación.",
            )
            .replace(&[(Section::Recovery, RANSOMWARE_REBUILD)]),
        Rule::when(Predicate::Equals(QuestionId::NetworkIsolated, "no"))
            .append(&[(Section::Containment, "URGENTE: Segmentar la red inmediatamente")]),
    ],
    immediate: &[
        "AISLAR INMEDIATAMENTE los sistemas afectados de la red para evitar propagación",
        "NO APAGAR los sistemas encriptados - mantenerlos encendidos para análisis forense",
        "Desconectar sistemas no afectados para protegerlos",
        "Tomar fotografías de las pantallas con notas de rescate",
        "Documentar todo: hora de detección, sistemas afectados, usuarios impactados",
        "Notificar al equipo de seguridad y dirección de TI",
        "NO PAGAR el rescate sin antes consultar con expertos en ciberseguridad",
    ],
    containment: &[
        "Identificar el vector de infección inicial (correo, RDP, vulnerabilidad)",
        "Revisar logs de firewall, proxy y sistemas para identificar actividad maliciosa",
        "Cambiar todas las contraseñas de administradores y cuentas privilegiadas",
        "Deshabilitar cuentas comprometidas temporalmente",
        "Bloquear IPs y dominios asociados al ransomware en firewall",
        "Escanear toda la red en busca de IOCs (Indicadores de Compromiso)",
    ],
    recovery: RANSOMWARE_REBUILD,
    long_term: &[
        "Implementar estrategia de backup 3-2-1 (3 copias, 2 medios diferentes, 1 offsite)",
        "Establecer copias de seguridad inmutables (air-gapped o WORM)",
        "Implementar EDR (Endpoint Detection and Response) en todos los endpoints",
        "Configurar monitoreo 24/7 con alertas de comportamiento anómalo",
        "Realizar pruebas periódicas de restauración de backups",
        "Implementar segmentación de red (Zero Trust)",
        "Capacitar al personal en ciberseguridad y phishing",
        "Mantener todos los sistemas actualizados con parches de seguridad",
        "Implementar autenticación multifactor (MFA) en todos los accesos",
        "Desarrollar y probar el plan de respuesta a incidentes",
        "Contratar seguro de ciberseguridad",
        "Realizar auditorías de seguridad periódicas",
    ],
    resources: &[
        "No More Ransom: https://www.nomoreransom.org/",
        "CISA Ransomware Guide: https://www.cisa.gov/stopransomware",
        "INCIBE (España): https://www.incibe.es/",
        "ID Ransomware (identificar variante): https://id-ransomware.malwarehunterteam.com/",
    ],
};

const RANSOMWARE_RESTORE: &[&str] = &[
    "Verificar la integridad de las copias de seguridad",
    "Asegurar que las copias de seguridad no están comprometidas",
    "Preparar un entorno limpio para la restauración",
    "Restaurar sistemas críticos primero en entorno aislado",
    "Verificar que el malware no persiste antes de conectar a producción",
    "Restaurar gradualmente, monitoreando constantemente",
    "Implementar monitoring adicional en sistemas restaurados",
];

const RANSOMWARE_REBUILD: &[&str] = &[
    "Consultar con empresa especializada en recuperación de ransomware",
    "Identificar la variante específica de ransomware",
    "Buscar en NoMoreRansom.org si existe descifrador gratuito",
    "Evaluar si existen puntos de restauración del sistema",
    "Considerar la reconstrucción completa de sistemas afectados",
    "Priorizar sistemas según criticidad para el negocio",
];

// Flat three-way decision: first match wins, no escalation.
pub(super) const PHISHING: RuleTable = RuleTable {
    base_severity: Severity::Low,
    narrative: Narrative {
        template: "",
        lookup: None,
    },
    rules: &[
        Rule::when(Predicate::Equals(QuestionId::CredentialsEntered, "yes"))
            .group("exposure")
            .severity(SeverityEffect::AtLeast(Severity::High))
            .clause(
                "Has identificado un incidente de phishing donde las credenciales fueron comprometidas.",
            )
            .replace(&[(
                Section::Immediate,
                &[
                    "CAMBIAR INMEDIATAMENTE todas las contraseñas de las cuentas afectadas",
                    "Cerrar todas las sesiones activas de las cuentas comprometidas",
                    "Habilitar autenticación multifactor (MFA) si no estaba activa",
                    "Notificar al equipo de seguridad",
                    "Revisar actividad reciente en las cuentas comprometidas",
                    "Bloquear temporalmente las cuentas si hay actividad sospechosa",
                ],
            )]),
        Rule::when(Predicate::Equals(QuestionId::ClickedLink, "yes"))
            .group("exposure")
            .severity(SeverityEffect::AtLeast(Severity::Medium))
            .clause(
                "Has identificado un incidente de phishing donde se hizo clic en un enlace malicioso.",
            )
            .replace(&[(
                Section::Immediate,
                &[
                    "Aislar el dispositivo de la red inmediatamente",
                    "Ejecutar análisis antivirus completo",
                    "Revisar procesos y conexiones de red activas",
                    "Cambiar contraseñas desde un dispositivo seguro como precaución",
                    "Documentar el incidente: URL del enlace, remitente, hora",
                ],
            )]),
        Rule::when(Predicate::Fallback)
            .group("exposure")
            .clause(
                "Has identificado un intento de phishing que fue correctamente detectado sin interacción.",
            )
            .replace(&[(
                Section::Immediate,
                &[
                    "Reportar el correo como phishing",
                    "Bloquear el remitente en los filtros de correo",
                    "Alertar a otros usuarios sobre este intento",
                    "Documentar el incidente para análisis de tendencias",
                ],
            )]),
    ],
    immediate: &[],
    containment: &[
        "Bloquear el dominio del remitente en filtros de correo",
        "Añadir URLs maliciosas a listas de bloqueo",
        "Buscar correos similares en otras bandejas de entrada",
        "Revisar logs de acceso para detectar accesos no autorizados",
    ],
    recovery: &[
        "Monitorear cuentas afectadas durante las próximas 48-72 horas",
        "Revisar configuración de reenvío de correo y reglas",
        "Verificar que no se hayan creado cuentas adicionales",
        "Confirmar que no se modificaron permisos de acceso",
    ],
    long_term: &[
        "Implementar filtros anti-phishing avanzados",
        "Capacitar a usuarios en identificación de phishing",
        "Implementar DMARC, SPF y DKIM para correo electrónico",
        "Realizar simulacros de phishing periódicos",
        "Implementar MFA en todos los servicios críticos",
        "Establecer protocolo de reporte de correos sospechosos",
    ],
    resources: &[
        "PhishTank: https://www.phishtank.com/",
        "Have I Been Pwned: https://haveibeenpwned.com/",
        "Google Safe Browsing: https://transparencyreport.google.com/safe-browsing/search",
    ],
};

pub(super) const DATA_BREACH: RuleTable = RuleTable {
    base_severity: Severity::High,
    narrative: Narrative {
        template: "Has identificado una posible brecha de datos en tu organización.",
        lookup: None,
    },
    rules: &[
        Rule::when(Predicate::ContainsAny(QuestionId::DataType, &["pii", "financial"]))
            .severity(SeverityEffect::AtLeast(Severity::Critical)),
        Rule::when(Predicate::ContainsAny(QuestionId::DataType, &["pii"])).clause(
            "Los datos comprometidos incluyen información personal identificable (PII), lo que requiere notificación a autoridades y usuarios afectados.",
        ),
    ],
    immediate: &[
        "Detener inmediatamente la filtración si está en curso",
        "Preservar evidencias para análisis forense",
        "Identificar el alcance: qué datos, cuántos registros, desde cuándo",
        "Notificar al equipo legal y de cumplimiento",
        "Preparar comunicación para partes afectadas",
        "Documentar todo el proceso detalladamente",
    ],
    containment: &[
        "Cerrar el vector de acceso que permitió la brecha",
        "Revocar credenciales comprometidas",
        "Aplicar parches de seguridad urgentes",
        "Revisar logs de acceso completos",
        "Implementar monitoreo adicional",
    ],
    recovery: &[
        "Evaluar daños y exposición de datos",
        "Notificar a autoridades (GDPR: 72 horas)",
        "Informar a usuarios afectados",
        "Ofrecer servicios de protección de identidad si aplica",
        "Implementar medidas correctivas",
    ],
    long_term: &[
        "Implementar DLP (Data Loss Prevention)",
        "Clasificar y etiquetar datos sensibles",
        "Cifrar datos en reposo y en tránsito",
        "Implementar principio de mínimo privilegio",
        "Realizar auditorías de acceso periódicas",
        "Establecer programa de gestión de vulnerabilidades",
        "Capacitar en protección de datos y GDPR",
    ],
    resources: &[
        "AEPD (España): https://www.aepd.es/",
        "GDPR Info: https://gdpr.eu/",
        "OWASP Data Protection: https://owasp.org/www-project-proactive-controls/",
    ],
};

pub(super) const MALWARE: RuleTable = RuleTable {
    base_severity: Severity::High,
    narrative: Narrative {
        template: "Se ha detectado malware en los sistemas de la organización que requiere atención inmediata.",
        lookup: None,
    },
    rules: &[],
    immediate: &[
        "Aislar sistemas infectados de la red",
        "Detener procesos maliciosos identificados",
        "Capturar muestras del malware para análisis",
        "Escanear sistemas con múltiples antivirus",
        "Documentar IOCs (Indicadores de Compromiso)",
    ],
    containment: &[
        "Identificar todos los sistemas comprometidos",
        "Bloquear C&C (Command and Control) servers",
        "Actualizar firewalls y IDS/IPS",
        "Desplegar EDR en endpoints críticos",
    ],
    recovery: &[
        "Limpiar sistemas infectados o reimaginarlos",
        "Restaurar desde backups limpios",
        "Cambiar credenciales potencialmente expuestas",
        "Verificar integridad de datos",
    ],
    long_term: &[
        "Implementar whitelisting de aplicaciones",
        "Mantener antivirus actualizado",
        "Implementar sandboxing para ejecutables",
        "Capacitar usuarios en seguridad",
        "Establecer baseline de comportamiento de red",
    ],
    resources: &[
        "VirusTotal: https://www.virustotal.com/",
        "Hybrid Analysis: https://www.hybrid-analysis.com/",
        "ANY.RUN: https://any.run/",
    ],
};

pub(super) const DDOS: RuleTable = RuleTable {
    base_severity: Severity::High,
    narrative: Narrative {
        template: "Estás experimentando un ataque de denegación de servicio distribuido (DDoS) contra tus servicios.",
        lookup: None,
    },
    rules: &[],
    immediate: &[
        "Activar mitigación DDoS con tu ISP o proveedor CDN",
        "Documentar patrones de tráfico anómalo",
        "Identificar IPs de origen del ataque",
        "Comunicar a stakeholders sobre posible downtime",
        "Activar plan de contingencia",
    ],
    containment: &[
        "Implementar rate limiting agresivo",
        "Bloquear rangos IP sospechosos",
        "Activar modo \"Under Attack\" en CDN",
        "Escalar recursos si es posible",
        "Filtrar tráfico malicioso en edge",
    ],
    recovery: &[
        "Monitorear normalización del tráfico",
        "Analizar logs para identificar vectores",
        "Restaurar servicios gradualmente",
        "Verificar integridad de aplicaciones",
    ],
    long_term: &[
        "Contratar servicio de protección DDoS",
        "Implementar CDN con protección DDoS",
        "Diseñar arquitectura resiliente",
        "Establecer acuerdos con ISP para mitigación",
        "Realizar pruebas de estrés periódicas",
        "Implementar redundancia geográfica",
    ],
    resources: &[
        "Cloudflare DDoS Protection",
        "Akamai Kona Site Defender",
        "AWS Shield",
    ],
};

pub(super) const UNAUTHORIZED_ACCESS: RuleTable = RuleTable {
    base_severity: Severity::Critical,
    narrative: Narrative {
        template: "Se ha detectado acceso no autorizado a sistemas o datos de la organización.",
        lookup: None,
    },
    rules: &[],
    immediate: &[
        "Revocar inmediatamente el acceso no autorizado",
        "Cambiar todas las credenciales comprometidas",
        "Cerrar todas las sesiones activas",
        "Aislar sistemas afectados",
        "Preservar logs para análisis forense",
        "Notificar a equipo de seguridad y legal",
    ],
    containment: &[
        "Identificar método de acceso utilizado",
        "Cerrar vulnerabilidades explotadas",
        "Revisar todos los accesos recientes",
        "Implementar MFA inmediatamente",
        "Auditar privilegios de todas las cuentas",
    ],
    recovery: &[
        "Analizar qué datos fueron accedidos",
        "Evaluar si hubo exfiltración de datos",
        "Restaurar configuraciones modificadas",
        "Verificar integridad de sistemas",
        "Evaluar necesidad de notificación a autoridades",
    ],
    long_term: &[
        "Implementar Zero Trust Architecture",
        "Establecer monitoreo de comportamiento de usuarios (UEBA)",
        "Implementar PAM (Privileged Access Management)",
        "Realizar auditorías de acceso periódicas",
        "Implementar autenticación multifactor obligatoria",
        "Establecer políticas de contraseñas robustas",
        "Capacitar en higiene de seguridad",
        "Implementar micro-segmentación de red",
    ],
    resources: &[
        "NIST Cybersecurity Framework",
        "CIS Controls",
        "MITRE ATT&CK Framework",
    ],
};

pub(super) const DEFAULT: RuleTable = RuleTable {
    base_severity: Severity::Medium,
    narrative: Narrative {
        template: "Se ha identificado un incidente de seguridad que requiere atención.",
        lookup: None,
    },
    rules: &[],
    immediate: &[
        "Documentar todos los detalles del incidente",
        "Notificar al equipo de seguridad",
        "Aislar sistemas afectados si es necesario",
        "Preservar evidencias",
    ],
    containment: &[
        "Identificar alcance del incidente",
        "Implementar controles temporales",
        "Monitorear actividad anómala",
    ],
    recovery: &[
        "Desarrollar plan de recuperación",
        "Implementar medidas correctivas",
        "Verificar efectividad de controles",
    ],
    long_term: &[
        "Realizar análisis de causa raíz",
        "Actualizar políticas de seguridad",
        "Capacitar al personal",
        "Mejorar controles preventivos",
    ],
    resources: &[
        "INCIBE: https://www.incibe.es/",
        "NIST: https://www.nist.gov/cyberframework",
    ],
};
