//! Suggested template catalog and built-in event definitions.
//!
//! One pre-written template per event × channel pair. Email entries carry a
//! plain-text body plus a complete inline-styled HTML document built from the
//! shared layout below.

use super::sample::keys_in_namespaces;
use super::types::{Channel, CreateTemplateRequest, EventOption, TemplateConfig};

/// Event identifiers used by the lending platform.
pub mod events {
    pub const OTP_VERIFICATION: &str = "otp_verification";
    pub const USER_REGISTERED: &str = "user_registered";
    pub const APPLICATION_SUBMITTED: &str = "application_submitted";
    pub const APPLICATION_IN_REVIEW: &str = "application_in_review";
    pub const APPLICATION_APPROVED: &str = "application_approved";
    pub const APPLICATION_REJECTED: &str = "application_rejected";
    pub const APPLICATION_DOCS_PENDING: &str = "application_docs_pending";
    pub const APPLICATION_CORRECTIONS: &str = "application_corrections_requested";
    pub const DOCUMENT_RECEIVED: &str = "document_received";
    pub const DOCUMENT_APPROVED: &str = "document_approved";
    pub const DOCUMENT_REJECTED: &str = "document_rejected";
    pub const KYC_VERIFIED: &str = "kyc_verified";
    pub const KYC_FAILED: &str = "kyc_failed";
    pub const APPLICATION_ASSIGNED: &str = "application_assigned";
    pub const REMINDER_INCOMPLETE: &str = "reminder_incomplete_application";
    pub const REMINDER_PENDING_DOCUMENTS: &str = "reminder_pending_documents";
}

use events::*;
use Channel::{Email, InApp, Sms, Whatsapp};

struct EventSpec {
    value: &'static str,
    label: &'static str,
    recommended: &'static [Channel],
    namespaces: &'static [&'static str],
}

const APPLICATION_NS: &[&str] = &["tenant", "applicant", "application"];

const EVENTS: &[EventSpec] = &[
    EventSpec {
        value: OTP_VERIFICATION,
        label: "Código de verificación (OTP)",
        recommended: &[Sms, Whatsapp],
        namespaces: &["tenant", "applicant", "otp"],
    },
    EventSpec {
        value: USER_REGISTERED,
        label: "Registro de usuario",
        recommended: &[Email],
        namespaces: &["tenant", "applicant"],
    },
    EventSpec {
        value: APPLICATION_SUBMITTED,
        label: "Solicitud enviada",
        recommended: &[Email, InApp],
        namespaces: APPLICATION_NS,
    },
    EventSpec {
        value: APPLICATION_IN_REVIEW,
        label: "Solicitud en revisión",
        recommended: &[Email, InApp],
        namespaces: APPLICATION_NS,
    },
    EventSpec {
        value: APPLICATION_APPROVED,
        label: "Solicitud aprobada",
        recommended: &[Email, Sms, Whatsapp, InApp],
        namespaces: APPLICATION_NS,
    },
    EventSpec {
        value: APPLICATION_REJECTED,
        label: "Solicitud rechazada",
        recommended: &[Email, InApp],
        namespaces: APPLICATION_NS,
    },
    EventSpec {
        value: APPLICATION_DOCS_PENDING,
        label: "Documentos pendientes",
        recommended: &[Email, Sms, InApp],
        namespaces: APPLICATION_NS,
    },
    EventSpec {
        value: APPLICATION_CORRECTIONS,
        label: "Correcciones solicitadas",
        recommended: &[Email, Whatsapp, InApp],
        namespaces: APPLICATION_NS,
    },
    EventSpec {
        value: DOCUMENT_RECEIVED,
        label: "Documento recibido",
        recommended: &[InApp],
        namespaces: &["tenant", "applicant", "application", "document"],
    },
    EventSpec {
        value: DOCUMENT_APPROVED,
        label: "Documento aprobado",
        recommended: &[InApp],
        namespaces: &["tenant", "applicant", "application", "document"],
    },
    EventSpec {
        value: DOCUMENT_REJECTED,
        label: "Documento rechazado",
        recommended: &[Email, Sms, InApp],
        namespaces: &["tenant", "applicant", "application", "document"],
    },
    EventSpec {
        value: KYC_VERIFIED,
        label: "Identidad verificada",
        recommended: &[Email, InApp],
        namespaces: &["tenant", "applicant", "application", "kyc"],
    },
    EventSpec {
        value: KYC_FAILED,
        label: "Verificación de identidad fallida",
        recommended: &[Email, InApp],
        namespaces: &["tenant", "applicant", "application", "kyc"],
    },
    EventSpec {
        value: APPLICATION_ASSIGNED,
        label: "Solicitud asignada (personal)",
        recommended: &[Email, InApp],
        namespaces: &["tenant", "applicant", "application", "staff", "assignment"],
    },
    EventSpec {
        value: REMINDER_INCOMPLETE,
        label: "Recordatorio: solicitud incompleta",
        recommended: &[Email, Sms],
        namespaces: &["tenant", "applicant", "application", "reminder"],
    },
    EventSpec {
        value: REMINDER_PENDING_DOCUMENTS,
        label: "Recordatorio: documentos pendientes",
        recommended: &[Email, Sms, Whatsapp],
        namespaces: &["tenant", "applicant", "application", "reminder"],
    },
];

/// Built-in template config, used when running without a backend.
pub fn default_config() -> TemplateConfig {
    TemplateConfig {
        events: EVENTS
            .iter()
            .map(|spec| EventOption {
                value: spec.value.to_string(),
                label: spec.label.to_string(),
                recommended_channels: spec.recommended.to_vec(),
                available_variables: keys_in_namespaces(spec.namespaces),
            })
            .collect(),
        channels: Channel::ALL.iter().map(Channel::default_option).collect(),
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Info,
    Success,
    Warning,
    Danger,
}

impl Tone {
    fn color(self) -> &'static str {
        match self {
            Tone::Info => "#2563EB",
            Tone::Success => "#16A34A",
            Tone::Warning => "#D97706",
            Tone::Danger => "#DC2626",
        }
    }
}

struct EmailContent {
    tone: Tone,
    heading: &'static str,
    paragraphs: &'static [&'static str],
    details: &'static [(&'static str, &'static str)],
    action: Option<(&'static str, &'static str)>,
}

struct Suggested {
    event: &'static str,
    channel: Channel,
    name: &'static str,
    priority: u8,
    subject: Option<&'static str>,
    body: &'static str,
    email: Option<EmailContent>,
}

const SUGGESTED: &[Suggested] = &[
    // ------------------------------------------------------------------
    // OTP
    // ------------------------------------------------------------------
    Suggested {
        event: OTP_VERIFICATION,
        channel: Sms,
        name: "Código OTP - SMS",
        priority: 10,
        subject: None,
        body: "{{tenant.name}}: Tu código de verificación es {{otp.code}}. \
               Vence en {{otp.expires_in}} minutos. No lo compartas con nadie.",
        email: None,
    },
    Suggested {
        event: OTP_VERIFICATION,
        channel: Whatsapp,
        name: "Código OTP - WhatsApp",
        priority: 10,
        subject: None,
        body: "*{{tenant.name}}*\n\n\
               Tu código de verificación es: *{{otp.code}}*\n\n\
               Este código vence en {{otp.expires_in}} minutos. \
               Nunca te pediremos este código por teléfono.",
        email: None,
    },
    Suggested {
        event: OTP_VERIFICATION,
        channel: Email,
        name: "Código OTP - Email",
        priority: 10,
        subject: Some("Tu código de verificación de {{tenant.name}}"),
        body: "Hola {{applicant.first_name}},\n\n\
               Tu código de verificación es: {{otp.code}}\n\n\
               El código vence en {{otp.expires_in}} minutos. Si no solicitaste este código, \
               ignora este mensaje.\n\n\
               Equipo {{tenant.name}}",
        email: Some(EmailContent {
            tone: Tone::Info,
            heading: "Tu código de verificación",
            paragraphs: &[
                "Hola {{applicant.first_name}},",
                "Usa el siguiente código para continuar con tu proceso:",
                "<span style=\"display:inline-block;padding:12px 24px;font-size:28px;\
                 letter-spacing:8px;font-weight:700;color:#111827;background-color:#F3F4F6;\
                 border-radius:8px;\">{{otp.code}}</span>",
                "El código vence en {{otp.expires_in}} minutos. Si no solicitaste este código, \
                 ignora este mensaje.",
            ],
            details: &[],
            action: None,
        }),
    },
    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------
    Suggested {
        event: USER_REGISTERED,
        channel: Email,
        name: "Bienvenida - Email",
        priority: 6,
        subject: Some("¡Bienvenido a {{tenant.name}}, {{applicant.first_name}}!"),
        body: "Hola {{applicant.first_name}},\n\n\
               Gracias por registrarte en {{tenant.name}}. Ya puedes iniciar tu solicitud de \
               crédito desde nuestro portal: {{tenant.portal_url}}\n\n\
               Si tienes dudas escríbenos a {{tenant.support_email}}.\n\n\
               Equipo {{tenant.name}}",
        email: Some(EmailContent {
            tone: Tone::Info,
            heading: "¡Te damos la bienvenida!",
            paragraphs: &[
                "Hola {{applicant.first_name}},",
                "Gracias por registrarte en <strong>{{tenant.name}}</strong>. Tu cuenta está lista \
                 y ya puedes iniciar tu solicitud de crédito en línea.",
                "Ten a la mano tu identificación oficial, comprobante de domicilio y comprobantes \
                 de ingresos para agilizar el proceso.",
            ],
            details: &[],
            action: Some(("Ir al portal", "{{tenant.portal_url}}")),
        }),
    },
    Suggested {
        event: USER_REGISTERED,
        channel: Whatsapp,
        name: "Bienvenida - WhatsApp",
        priority: 5,
        subject: None,
        body: "¡Hola {{applicant.first_name}}! 👋\n\n\
               Bienvenido a *{{tenant.name}}*. Tu cuenta fue creada correctamente.\n\n\
               Inicia tu solicitud aquí: {{tenant.portal_url}}",
        email: None,
    },
    // ------------------------------------------------------------------
    // Application submitted
    // ------------------------------------------------------------------
    Suggested {
        event: APPLICATION_SUBMITTED,
        channel: Email,
        name: "Solicitud enviada - Email",
        priority: 7,
        subject: Some("Recibimos tu solicitud {{application.folio}}"),
        body: "Hola {{applicant.first_name}},\n\n\
               Recibimos tu solicitud de {{application.product}} con folio {{application.folio}} \
               por {{application.amount}} a {{application.term}}.\n\n\
               Te notificaremos cuando nuestro equipo comience la revisión. Puedes consultar el \
               estatus en {{application.url}}\n\n\
               Equipo {{tenant.name}}",
        email: Some(EmailContent {
            tone: Tone::Info,
            heading: "Recibimos tu solicitud",
            paragraphs: &[
                "Hola {{applicant.first_name}},",
                "Tu solicitud fue enviada correctamente. Te notificaremos cuando nuestro equipo \
                 comience la revisión.",
            ],
            details: &[
                ("Folio", "{{application.folio}}"),
                ("Producto", "{{application.product}}"),
                ("Monto solicitado", "{{application.amount}}"),
                ("Plazo", "{{application.term}}"),
                ("Fecha de envío", "{{application.submitted_at}}"),
            ],
            action: Some(("Ver mi solicitud", "{{application.url}}")),
        }),
    },
    Suggested {
        event: APPLICATION_SUBMITTED,
        channel: Sms,
        name: "Solicitud enviada - SMS",
        priority: 6,
        subject: None,
        body: "{{tenant.name}}: Recibimos tu solicitud {{application.folio}}. \
               Te avisaremos cuando inicie su revisión.",
        email: None,
    },
    Suggested {
        event: APPLICATION_SUBMITTED,
        channel: InApp,
        name: "Solicitud enviada - App",
        priority: 5,
        subject: Some("Solicitud enviada"),
        body: "Tu solicitud {{application.folio}} por {{application.amount}} fue enviada. \
               Te avisaremos cuando inicie la revisión.",
        email: None,
    },
    // ------------------------------------------------------------------
    // Application in review
    // ------------------------------------------------------------------
    Suggested {
        event: APPLICATION_IN_REVIEW,
        channel: Email,
        name: "Solicitud en revisión - Email",
        priority: 5,
        subject: Some("Tu solicitud {{application.folio}} está en revisión"),
        body: "Hola {{applicant.first_name}},\n\n\
               Un analista de {{tenant.name}} ya está revisando tu solicitud \
               {{application.folio}}. Este proceso suele tomar entre 24 y 48 horas hábiles.\n\n\
               Te contactaremos si necesitamos información adicional.\n\n\
               Equipo {{tenant.name}}",
        email: Some(EmailContent {
            tone: Tone::Info,
            heading: "Tu solicitud está en revisión",
            paragraphs: &[
                "Hola {{applicant.first_name}},",
                "Un analista ya está revisando tu solicitud <strong>{{application.folio}}</strong>. \
                 Este proceso suele tomar entre 24 y 48 horas hábiles.",
                "Te contactaremos si necesitamos información adicional.",
            ],
            details: &[],
            action: Some(("Consultar estatus", "{{application.url}}")),
        }),
    },
    Suggested {
        event: APPLICATION_IN_REVIEW,
        channel: InApp,
        name: "Solicitud en revisión - App",
        priority: 4,
        subject: Some("Solicitud en revisión"),
        body: "Un analista está revisando tu solicitud {{application.folio}}.",
        email: None,
    },
    // ------------------------------------------------------------------
    // Application approved
    // ------------------------------------------------------------------
    Suggested {
        event: APPLICATION_APPROVED,
        channel: Email,
        name: "Solicitud aprobada - Email",
        priority: 9,
        subject: Some("¡Tu crédito fue aprobado! Folio {{application.folio}}"),
        body: "¡Felicidades {{applicant.first_name}}!\n\n\
               Tu solicitud {{application.folio}} de {{application.product}} fue aprobada.\n\n\
               Monto aprobado: {{application.amount}}\n\
               Plazo: {{application.term}}\n\
               Pago mensual estimado: {{application.monthly_payment}}\n\n\
               Ingresa a {{application.url}} para firmar tu contrato.\n\n\
               Equipo {{tenant.name}}",
        email: Some(EmailContent {
            tone: Tone::Success,
            heading: "¡Tu crédito fue aprobado!",
            paragraphs: &[
                "¡Felicidades {{applicant.first_name}}!",
                "Tu solicitud de <strong>{{application.product}}</strong> fue aprobada. \
                 Estos son los términos de tu crédito:",
            ],
            details: &[
                ("Folio", "{{application.folio}}"),
                ("Monto aprobado", "{{application.amount}}"),
                ("Plazo", "{{application.term}}"),
                ("Pago mensual estimado", "{{application.monthly_payment}}"),
            ],
            action: Some(("Firmar mi contrato", "{{application.url}}")),
        }),
    },
    Suggested {
        event: APPLICATION_APPROVED,
        channel: Sms,
        name: "Solicitud aprobada - SMS",
        priority: 9,
        subject: None,
        body: "{{tenant.name}}: ¡Felicidades {{applicant.first_name}}! Tu solicitud \
               {{application.folio}} por {{application.amount}} fue aprobada. \
               Revisa tu correo para continuar.",
        email: None,
    },
    Suggested {
        event: APPLICATION_APPROVED,
        channel: Whatsapp,
        name: "Solicitud aprobada - WhatsApp",
        priority: 9,
        subject: None,
        body: "🎉 ¡Felicidades {{applicant.first_name}}!\n\n\
               Tu solicitud *{{application.folio}}* fue *aprobada*.\n\n\
               • Monto: {{application.amount}}\n\
               • Plazo: {{application.term}}\n\
               • Pago mensual: {{application.monthly_payment}}\n\n\
               Firma tu contrato aquí: {{application.url}}",
        email: None,
    },
    Suggested {
        event: APPLICATION_APPROVED,
        channel: InApp,
        name: "Solicitud aprobada - App",
        priority: 9,
        subject: Some("¡Crédito aprobado!"),
        body: "Tu solicitud {{application.folio}} por {{application.amount}} fue aprobada. \
               Firma tu contrato para recibir el depósito.",
        email: None,
    },
    // ------------------------------------------------------------------
    // Application rejected
    // ------------------------------------------------------------------
    Suggested {
        event: APPLICATION_REJECTED,
        channel: Email,
        name: "Solicitud rechazada - Email",
        priority: 8,
        subject: Some("Actualización de tu solicitud {{application.folio}}"),
        body: "Hola {{applicant.first_name}},\n\n\
               Lamentamos informarte que tu solicitud {{application.folio}} no fue aprobada.\n\n\
               Motivo: {{application.rejection_reason}}\n\n\
               Podrás presentar una nueva solicitud en 90 días. Si tienes dudas, comunícate al \
               {{tenant.support_phone}} o a {{tenant.support_email}}.\n\n\
               Equipo {{tenant.name}}",
        email: Some(EmailContent {
            tone: Tone::Danger,
            heading: "Tu solicitud no fue aprobada",
            paragraphs: &[
                "Hola {{applicant.first_name}},",
                "Lamentamos informarte que tu solicitud <strong>{{application.folio}}</strong> \
                 no fue aprobada en esta ocasión.",
                "<strong>Motivo:</strong> {{application.rejection_reason}}",
                "Podrás presentar una nueva solicitud en 90 días. Si tienes dudas, comunícate \
                 con nosotros.",
            ],
            details: &[],
            action: None,
        }),
    },
    Suggested {
        event: APPLICATION_REJECTED,
        channel: Sms,
        name: "Solicitud rechazada - SMS",
        priority: 7,
        subject: None,
        body: "{{tenant.name}}: Tu solicitud {{application.folio}} no fue aprobada. \
               Consulta los detalles en tu correo o llama al {{tenant.support_phone}}.",
        email: None,
    },
    Suggested {
        event: APPLICATION_REJECTED,
        channel: InApp,
        name: "Solicitud rechazada - App",
        priority: 7,
        subject: Some("Solicitud no aprobada"),
        body: "Tu solicitud {{application.folio}} no fue aprobada. \
               Motivo: {{application.rejection_reason}}.",
        email: None,
    },
    // ------------------------------------------------------------------
    // Documents pending
    // ------------------------------------------------------------------
    Suggested {
        event: APPLICATION_DOCS_PENDING,
        channel: Email,
        name: "Documentos pendientes - Email",
        priority: 8,
        subject: Some("Necesitamos documentos para tu solicitud {{application.folio}}"),
        body: "Hola {{applicant.first_name}},\n\n\
               Para continuar con tu solicitud {{application.folio}} necesitamos los siguientes \
               documentos:\n\n\
               {{application.pending_documents}}\n\n\
               Súbelos desde {{application.url}}\n\n\
               Equipo {{tenant.name}}",
        email: Some(EmailContent {
            tone: Tone::Warning,
            heading: "Faltan documentos",
            paragraphs: &[
                "Hola {{applicant.first_name}},",
                "Para continuar con tu solicitud <strong>{{application.folio}}</strong> \
                 necesitamos los siguientes documentos:",
                "<strong>{{application.pending_documents}}</strong>",
                "Asegúrate de que las imágenes sean legibles y estén vigentes.",
            ],
            details: &[],
            action: Some(("Subir documentos", "{{application.url}}")),
        }),
    },
    Suggested {
        event: APPLICATION_DOCS_PENDING,
        channel: Sms,
        name: "Documentos pendientes - SMS",
        priority: 7,
        subject: None,
        body: "{{tenant.name}}: Faltan documentos en tu solicitud {{application.folio}}. \
               Súbelos en {{tenant.portal_url}} para continuar.",
        email: None,
    },
    Suggested {
        event: APPLICATION_DOCS_PENDING,
        channel: InApp,
        name: "Documentos pendientes - App",
        priority: 7,
        subject: Some("Documentos pendientes"),
        body: "Faltan documentos en tu solicitud {{application.folio}}: \
               {{application.pending_documents}}.",
        email: None,
    },
    // ------------------------------------------------------------------
    // Corrections requested
    // ------------------------------------------------------------------
    Suggested {
        event: APPLICATION_CORRECTIONS,
        channel: Email,
        name: "Correcciones solicitadas - Email",
        priority: 8,
        subject: Some("Tu solicitud {{application.folio}} requiere correcciones"),
        body: "Hola {{applicant.first_name}},\n\n\
               Revisamos tu solicitud {{application.folio}} y necesitamos que corrijas lo \
               siguiente:\n\n\
               {{application.corrections}}\n\n\
               Realiza los cambios en {{application.url}}\n\n\
               Equipo {{tenant.name}}",
        email: Some(EmailContent {
            tone: Tone::Warning,
            heading: "Tu solicitud requiere correcciones",
            paragraphs: &[
                "Hola {{applicant.first_name}},",
                "Revisamos tu solicitud <strong>{{application.folio}}</strong> y necesitamos \
                 que corrijas lo siguiente:",
                "{{application.corrections}}",
            ],
            details: &[],
            action: Some(("Corregir solicitud", "{{application.url}}")),
        }),
    },
    Suggested {
        event: APPLICATION_CORRECTIONS,
        channel: Whatsapp,
        name: "Correcciones solicitadas - WhatsApp",
        priority: 7,
        subject: None,
        body: "Hola {{applicant.first_name}}, tu solicitud *{{application.folio}}* \
               requiere correcciones:\n\n\
               {{application.corrections}}\n\n\
               Corrígela aquí: {{application.url}}",
        email: None,
    },
    Suggested {
        event: APPLICATION_CORRECTIONS,
        channel: InApp,
        name: "Correcciones solicitadas - App",
        priority: 7,
        subject: Some("Correcciones requeridas"),
        body: "Tu solicitud {{application.folio}} requiere correcciones: \
               {{application.corrections}}.",
        email: None,
    },
    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------
    Suggested {
        event: DOCUMENT_RECEIVED,
        channel: InApp,
        name: "Documento recibido - App",
        priority: 3,
        subject: Some("Documento recibido"),
        body: "Recibimos tu {{document.name}}. Lo revisaremos en breve.",
        email: None,
    },
    Suggested {
        event: DOCUMENT_APPROVED,
        channel: InApp,
        name: "Documento aprobado - App",
        priority: 4,
        subject: Some("Documento aprobado"),
        body: "Tu {{document.name}} fue validado correctamente.",
        email: None,
    },
    Suggested {
        event: DOCUMENT_REJECTED,
        channel: Email,
        name: "Documento rechazado - Email",
        priority: 7,
        subject: Some("Tu documento {{document.name}} fue rechazado"),
        body: "Hola {{applicant.first_name}},\n\n\
               El documento {{document.name}} de tu solicitud {{application.folio}} fue \
               rechazado.\n\n\
               Motivo: {{document.rejection_reason}}\n\n\
               Súbelo nuevamente desde {{application.url}}\n\n\
               Equipo {{tenant.name}}",
        email: Some(EmailContent {
            tone: Tone::Danger,
            heading: "Documento rechazado",
            paragraphs: &[
                "Hola {{applicant.first_name}},",
                "El documento <strong>{{document.name}}</strong> de tu solicitud \
                 {{application.folio}} fue rechazado.",
                "<strong>Motivo:</strong> {{document.rejection_reason}}",
            ],
            details: &[],
            action: Some(("Subir de nuevo", "{{application.url}}")),
        }),
    },
    Suggested {
        event: DOCUMENT_REJECTED,
        channel: Sms,
        name: "Documento rechazado - SMS",
        priority: 6,
        subject: None,
        body: "{{tenant.name}}: Tu documento {{document.name}} fue rechazado: \
               {{document.rejection_reason}}. Súbelo de nuevo desde el portal.",
        email: None,
    },
    Suggested {
        event: DOCUMENT_REJECTED,
        channel: InApp,
        name: "Documento rechazado - App",
        priority: 6,
        subject: Some("Documento rechazado"),
        body: "Tu {{document.name}} fue rechazado: {{document.rejection_reason}}.",
        email: None,
    },
    // ------------------------------------------------------------------
    // KYC
    // ------------------------------------------------------------------
    Suggested {
        event: KYC_VERIFIED,
        channel: Email,
        name: "Identidad verificada - Email",
        priority: 6,
        subject: Some("Verificamos tu identidad"),
        body: "Hola {{applicant.first_name}},\n\n\
               Tu identidad fue verificada correctamente. Tu solicitud {{application.folio}} \
               continúa su proceso.\n\n\
               Equipo {{tenant.name}}",
        email: Some(EmailContent {
            tone: Tone::Success,
            heading: "Identidad verificada",
            paragraphs: &[
                "Hola {{applicant.first_name}},",
                "Tu identidad fue verificada correctamente. Tu solicitud \
                 <strong>{{application.folio}}</strong> continúa su proceso.",
            ],
            details: &[],
            action: Some(("Ver mi solicitud", "{{application.url}}")),
        }),
    },
    Suggested {
        event: KYC_VERIFIED,
        channel: InApp,
        name: "Identidad verificada - App",
        priority: 5,
        subject: Some("Identidad verificada"),
        body: "Verificamos tu identidad. Tu solicitud {{application.folio}} continúa su proceso.",
        email: None,
    },
    Suggested {
        event: KYC_FAILED,
        channel: Email,
        name: "Verificación fallida - Email",
        priority: 8,
        subject: Some("No pudimos verificar tu identidad"),
        body: "Hola {{applicant.first_name}},\n\n\
               No pudimos verificar tu identidad para la solicitud {{application.folio}}.\n\n\
               Motivo: {{kyc.failure_reason}}\n\n\
               Intenta nuevamente desde {{application.url}} con buena iluminación y tu \
               identificación vigente.\n\n\
               Equipo {{tenant.name}}",
        email: Some(EmailContent {
            tone: Tone::Danger,
            heading: "No pudimos verificar tu identidad",
            paragraphs: &[
                "Hola {{applicant.first_name}},",
                "No pudimos verificar tu identidad para la solicitud \
                 <strong>{{application.folio}}</strong>.",
                "<strong>Motivo:</strong> {{kyc.failure_reason}}",
                "Intenta nuevamente en un lugar con buena iluminación y con tu identificación \
                 vigente.",
            ],
            details: &[],
            action: Some(("Reintentar verificación", "{{application.url}}")),
        }),
    },
    Suggested {
        event: KYC_FAILED,
        channel: InApp,
        name: "Verificación fallida - App",
        priority: 7,
        subject: Some("Verificación fallida"),
        body: "No pudimos verificar tu identidad: {{kyc.failure_reason}}. Intenta de nuevo.",
        email: None,
    },
    // ------------------------------------------------------------------
    // Staff assignment
    // ------------------------------------------------------------------
    Suggested {
        event: APPLICATION_ASSIGNED,
        channel: Email,
        name: "Solicitud asignada - Email",
        priority: 6,
        subject: Some("Se te asignó la solicitud {{application.folio}}"),
        body: "Hola {{staff.name}},\n\n\
               {{assignment.assigned_by}} te asignó la solicitud {{application.folio}} de \
               {{applicant.full_name}} por {{application.amount}}.\n\n\
               Revísala en la consola de administración.\n\n\
               {{tenant.name}}",
        email: Some(EmailContent {
            tone: Tone::Info,
            heading: "Nueva solicitud asignada",
            paragraphs: &[
                "Hola {{staff.name}},",
                "{{assignment.assigned_by}} te asignó una nueva solicitud para revisión.",
            ],
            details: &[
                ("Folio", "{{application.folio}}"),
                ("Solicitante", "{{applicant.full_name}}"),
                ("Producto", "{{application.product}}"),
                ("Monto", "{{application.amount}}"),
            ],
            action: None,
        }),
    },
    Suggested {
        event: APPLICATION_ASSIGNED,
        channel: InApp,
        name: "Solicitud asignada - App",
        priority: 6,
        subject: Some("Nueva solicitud asignada"),
        body: "{{assignment.assigned_by}} te asignó la solicitud {{application.folio}} \
               de {{applicant.full_name}}.",
        email: None,
    },
    // ------------------------------------------------------------------
    // Reminders
    // ------------------------------------------------------------------
    Suggested {
        event: REMINDER_INCOMPLETE,
        channel: Email,
        name: "Recordatorio solicitud incompleta - Email",
        priority: 4,
        subject: Some("Tu solicitud {{application.folio}} está incompleta"),
        body: "Hola {{applicant.first_name}},\n\n\
               Notamos que tu solicitud {{application.folio}} sigue incompleta. Termínala en \
               pocos minutos desde {{application.url}}\n\n\
               Equipo {{tenant.name}}",
        email: Some(EmailContent {
            tone: Tone::Warning,
            heading: "Tu solicitud está incompleta",
            paragraphs: &[
                "Hola {{applicant.first_name}},",
                "Notamos que tu solicitud <strong>{{application.folio}}</strong> sigue \
                 incompleta. Termínala en pocos minutos para que podamos revisarla.",
            ],
            details: &[],
            action: Some(("Continuar solicitud", "{{application.url}}")),
        }),
    },
    Suggested {
        event: REMINDER_INCOMPLETE,
        channel: Sms,
        name: "Recordatorio solicitud incompleta - SMS",
        priority: 4,
        subject: None,
        body: "{{tenant.name}}: {{applicant.first_name}}, tu solicitud {{application.folio}} \
               sigue incompleta. Termínala en {{tenant.portal_url}}",
        email: None,
    },
    Suggested {
        event: REMINDER_PENDING_DOCUMENTS,
        channel: Email,
        name: "Recordatorio documentos pendientes - Email",
        priority: 5,
        subject: Some("Recordatorio: documentos pendientes en {{application.folio}}"),
        body: "Hola {{applicant.first_name}},\n\n\
               Hace {{reminder.days_pending}} días te solicitamos documentos para tu solicitud \
               {{application.folio}}:\n\n\
               {{application.pending_documents}}\n\n\
               Súbelos desde {{application.url}} para no retrasar tu crédito.\n\n\
               Equipo {{tenant.name}}",
        email: Some(EmailContent {
            tone: Tone::Warning,
            heading: "Tienes documentos pendientes",
            paragraphs: &[
                "Hola {{applicant.first_name}},",
                "Hace {{reminder.days_pending}} días te solicitamos documentos para tu \
                 solicitud <strong>{{application.folio}}</strong>:",
                "<strong>{{application.pending_documents}}</strong>",
                "Súbelos para no retrasar tu crédito.",
            ],
            details: &[],
            action: Some(("Subir documentos", "{{application.url}}")),
        }),
    },
    Suggested {
        event: REMINDER_PENDING_DOCUMENTS,
        channel: Sms,
        name: "Recordatorio documentos pendientes - SMS",
        priority: 5,
        subject: None,
        body: "{{tenant.name}}: Tienes documentos pendientes desde hace \
               {{reminder.days_pending}} días en la solicitud {{application.folio}}. \
               Súbelos para no retrasar tu crédito.",
        email: None,
    },
    Suggested {
        event: REMINDER_PENDING_DOCUMENTS,
        channel: Whatsapp,
        name: "Recordatorio documentos pendientes - WhatsApp",
        priority: 5,
        subject: None,
        body: "Hola {{applicant.first_name}} 👋\n\n\
               Tu solicitud *{{application.folio}}* tiene documentos pendientes desde hace \
               {{reminder.days_pending}} días:\n\n\
               {{application.pending_documents}}\n\n\
               Súbelos aquí: {{application.url}}",
        email: None,
    },
];

fn render_paragraph(text: &str) -> String {
    format!(
        "<p style=\"margin:0 0 16px;font-size:15px;line-height:24px;color:#374151;\">{}</p>",
        text
    )
}

fn render_details(details: &[(&str, &str)]) -> String {
    if details.is_empty() {
        return String::new();
    }

    let rows: String = details
        .iter()
        .map(|(label, value)| {
            format!(
                "<tr>\
                 <td style=\"padding:8px 12px;font-size:14px;color:#6B7280;border-bottom:1px solid #E5E7EB;\">{}</td>\
                 <td style=\"padding:8px 12px;font-size:14px;font-weight:600;color:#111827;border-bottom:1px solid #E5E7EB;text-align:right;\">{}</td>\
                 </tr>",
                label, value
            )
        })
        .collect();

    format!(
        "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" \
         style=\"margin:0 0 24px;border:1px solid #E5E7EB;border-radius:8px;border-collapse:separate;\">{}</table>",
        rows
    )
}

fn render_action(action: Option<(&str, &str)>) -> String {
    match action {
        Some((label, href)) => format!(
            "<div style=\"margin:8px 0 24px;text-align:center;\">\
             <a href=\"{}\" style=\"display:inline-block;padding:12px 28px;font-size:15px;font-weight:600;\
             color:#FFFFFF;text-decoration:none;background-color:{{{{tenant.primary_color}}}};border-radius:6px;\">{}</a>\
             </div>",
            href, label
        ),
        None => String::new(),
    }
}

/// Full inline-styled HTML email around `content`.
fn render_email(content: &EmailContent) -> String {
    let paragraphs: String = content.paragraphs.iter().map(|p| render_paragraph(p)).collect();

    format!(
        "<!DOCTYPE html>\
<html lang=\"es\">\
<head><meta charset=\"UTF-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\"><title>{{{{tenant.name}}}}</title></head>\
<body style=\"margin:0;padding:0;background-color:#F3F4F6;font-family:Arial,Helvetica,sans-serif;\">\
<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" style=\"background-color:#F3F4F6;padding:24px 0;\">\
<tr><td align=\"center\">\
<table role=\"presentation\" width=\"600\" cellpadding=\"0\" cellspacing=\"0\" style=\"max-width:600px;width:100%;background-color:#FFFFFF;border-radius:12px;overflow:hidden;\">\
<tr><td style=\"padding:24px 32px;background-color:{{{{tenant.primary_color}}}};text-align:center;\">\
<img src=\"{{{{tenant.logo_url}}}}\" alt=\"{{{{tenant.name}}}}\" height=\"40\" style=\"display:inline-block;border:0;\">\
</td></tr>\
<tr><td style=\"padding:32px;\">\
<h1 style=\"margin:0 0 24px;font-size:22px;line-height:30px;color:{accent};\">{heading}</h1>\
{paragraphs}{details}{action}\
</td></tr>\
<tr><td style=\"padding:20px 32px;background-color:#F9FAFB;text-align:center;font-size:12px;line-height:18px;color:#6B7280;\">\
¿Tienes dudas? Escríbenos a <a href=\"mailto:{{{{tenant.support_email}}}}\" style=\"color:#6B7280;\">{{{{tenant.support_email}}}}</a> \
o llámanos al {{{{tenant.support_phone}}}}.<br>\
© {{{{tenant.name}}}}. Todos los derechos reservados.\
</td></tr>\
</table>\
</td></tr>\
</table>\
</body>\
</html>",
        accent = content.tone.color(),
        heading = content.heading,
        paragraphs = paragraphs,
        details = render_details(content.details),
        action = render_action(content.action),
    )
}

/// The predefined templates, in provisioning order.
pub fn suggested_templates() -> Vec<CreateTemplateRequest> {
    SUGGESTED
        .iter()
        .map(|s| CreateTemplateRequest {
            name: s.name.to_string(),
            event: s.event.to_string(),
            channel: s.channel,
            is_active: true,
            priority: s.priority,
            subject: s.subject.map(str::to_string),
            body: s.body.to_string(),
            html_body: s.email.as_ref().map(render_email),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::template::advisory::advisories;
    use crate::template::preview::{render_preview, strip_html};

    #[test]
    fn test_catalog_size_and_coverage() {
        let templates = suggested_templates();
        assert!((30..=40).contains(&templates.len()), "got {}", templates.len());

        let events: HashSet<&str> = templates.iter().map(|t| t.event.as_str()).collect();
        for spec in EVENTS {
            assert!(events.contains(spec.value), "no template for {}", spec.value);
        }

        let channels: HashSet<Channel> = templates.iter().map(|t| t.channel).collect();
        assert_eq!(channels.len(), 4);
    }

    #[test]
    fn test_one_template_per_event_channel() {
        let mut seen = HashSet::new();
        for t in suggested_templates() {
            assert!(
                seen.insert((t.event.clone(), t.channel)),
                "duplicate {} / {}",
                t.event,
                t.channel
            );
        }
    }

    #[test]
    fn test_catalog_is_valid_and_advisory_free() {
        let config = default_config();
        for t in suggested_templates() {
            assert!(t.validate().is_ok(), "{} is invalid", t.name);
            let found = advisories(&t, &config);
            assert!(found.is_empty(), "{}: {:?}", t.name, found);
        }
    }

    #[test]
    fn test_rendered_previews_have_no_placeholders_left() {
        for t in suggested_templates() {
            let mut parts = vec![render_preview(&t.body)];
            if let Some(subject) = &t.subject {
                parts.push(render_preview(subject));
            }
            if let Some(html) = &t.html_body {
                parts.push(strip_html(&render_preview(html)));
            }
            for part in parts {
                assert!(!part.contains("{{"), "{} left a placeholder: {}", t.name, part);
            }
        }
    }

    #[test]
    fn test_only_email_carries_html() {
        for t in suggested_templates() {
            assert_eq!(t.html_body.is_some(), t.channel == Channel::Email, "{}", t.name);
        }
    }

    #[test]
    fn test_email_layout_is_a_full_document() {
        let approved = suggested_templates()
            .into_iter()
            .find(|t| t.event == APPLICATION_APPROVED && t.channel == Channel::Email)
            .unwrap();
        let html = approved.html_body.unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("background-color:{{tenant.primary_color}}"));
        assert!(html.contains("color:#16A34A"));

        let text = strip_html(&render_preview(&html));
        assert!(text.starts_with("¡Tu crédito fue aprobado!"));
        assert!(text.contains("Monto aprobado$50,000.00"));
        assert!(text.contains("Firmar mi contrato"));
    }

    #[test]
    fn test_default_config_variables() {
        let config = default_config();
        assert_eq!(config.events.len(), EVENTS.len());
        let otp = config.event(OTP_VERIFICATION).unwrap();
        assert!(otp.available_variables.contains(&"otp.code".to_string()));
        assert!(!otp.available_variables.contains(&"application.folio".to_string()));
        assert_eq!(config.channels.len(), 4);
    }
}
