use crate::config::Variant;
use crate::env::EnvFile;
use crate::error::{Result, SetupError};
use crate::prompt::{Prompter, Validator};
use crate::secret::generate_secret;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_DASHBOARD_PORT: u16 = 3000;
pub const DEFAULT_BACKEND_PORT: u16 = 3001;
pub const DEFAULT_USER_EMAIL: &str = "admin@supallm.com";
pub const DEFAULT_USER_PASSWORD: &str = "supallm";

/// Accepted values by env key.
pub type Answers = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub enum FieldKind {
    Text {
        message: &'static str,
        default: Option<&'static str>,
        empty_error: &'static str,
    },
    Port {
        message: &'static str,
        default: u16,
        reserved: &'static [u16],
        /// Earlier port fields this one must not collide with, as
        /// `(key, label)`.
        distinct_from: &'static [(&'static str, &'static str)],
    },
    /// Yes/no toggle; "yes" writes a freshly generated secret.
    Secret { message: &'static str },
    /// Not asked; computed from earlier answers. `None` skips the field.
    Derived(fn(&Answers) -> Option<String>),
}

#[derive(Debug, Clone)]
pub struct Field {
    pub key: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, Clone)]
pub struct Questionnaire {
    /// Printed before the first question.
    pub intro: &'static [&'static str],
    pub fields: Vec<Field>,
    /// Whether the flow offers to start the stack afterwards.
    pub offers_launch: bool,
}

const SECRET_MESSAGE: &str =
    "Generate a secret key for encrypting sensitive database values? (recommended)";
const DASHBOARD_PORT_MESSAGE: &str =
    "Enter the port you want to run the dashboard on (default is 3000):";

impl Questionnaire {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self::classic(),
            Variant::Standard => Self::standard(),
        }
    }

    fn classic() -> Self {
        Self {
            intro: &[
                "We use Clerk to manage users and organizations.",
                "You can get Clerk keys for FREE at https://clerk.com/. We plan to remove this dependency asap.",
            ],
            fields: vec![
                Field {
                    key: "CLERK_PUBLISHABLE_KEY",
                    kind: FieldKind::Text {
                        message: "Enter your Clerk Publishable Key:",
                        default: None,
                        empty_error: "Clerk Publishable Key cannot be empty. This is where your organization will be stored.",
                    },
                },
                Field {
                    key: "CLERK_SECRET_KEY",
                    kind: FieldKind::Text {
                        message: "Enter your Clerk Secret Key:",
                        default: None,
                        empty_error: "Clerk Secret Key cannot be empty. This is where your organization will be stored.",
                    },
                },
                Field {
                    key: "SECRET_KEY",
                    kind: FieldKind::Secret {
                        message: SECRET_MESSAGE,
                    },
                },
                Field {
                    key: "FRONTEND_PORT",
                    kind: FieldKind::Port {
                        message: DASHBOARD_PORT_MESSAGE,
                        default: DEFAULT_DASHBOARD_PORT,
                        reserved: &[3001, 5431, 6379],
                        distinct_from: &[],
                    },
                },
            ],
            offers_launch: false,
        }
    }

    fn standard() -> Self {
        Self {
            intro: &["An admin account is created on first start with the credentials below."],
            fields: vec![
                Field {
                    key: "INITIAL_USER_EMAIL",
                    kind: FieldKind::Text {
                        message: "Enter the email of the initial admin user:",
                        default: Some(DEFAULT_USER_EMAIL),
                        empty_error: "Email cannot be empty.",
                    },
                },
                Field {
                    key: "INITIAL_USER_PASSWORD",
                    kind: FieldKind::Text {
                        message: "Enter the password of the initial admin user:",
                        default: Some(DEFAULT_USER_PASSWORD),
                        empty_error: "Password cannot be empty.",
                    },
                },
                Field {
                    key: "SECRET_KEY",
                    kind: FieldKind::Secret {
                        message: SECRET_MESSAGE,
                    },
                },
                Field {
                    key: "FRONTEND_PORT",
                    kind: FieldKind::Port {
                        message: DASHBOARD_PORT_MESSAGE,
                        default: DEFAULT_DASHBOARD_PORT,
                        reserved: &[3001, 5431, 6379],
                        distinct_from: &[],
                    },
                },
                Field {
                    key: "BACKEND_PORT",
                    kind: FieldKind::Port {
                        message: "Enter the port you want to run the backend API on (default is 3001):",
                        default: DEFAULT_BACKEND_PORT,
                        reserved: &[3000, 5431, 6379],
                        distinct_from: &[("FRONTEND_PORT", "dashboard")],
                    },
                },
                Field {
                    key: "SUPALLM_API_URL",
                    kind: FieldKind::Derived(|answers| {
                        answers
                            .get("BACKEND_PORT")
                            .map(|port| format!("http://localhost:{port}"))
                    }),
                },
            ],
            offers_launch: true,
        }
    }
}

pub fn validate_not_empty(input: &str, empty_error: &str) -> std::result::Result<(), String> {
    if input.trim().is_empty() {
        return Err(empty_error.to_string());
    }
    Ok(())
}

/// `taken` holds `(label, port)` pairs chosen by earlier fields.
pub fn validate_port(
    input: &str,
    reserved: &[u16],
    taken: &[(&str, u16)],
) -> std::result::Result<(), String> {
    parse_port(input, reserved, taken).map(|_| ())
}

/// Like [`validate_port`], but hands back the port so `+4000` or `04000`
/// end up written as `4000`.
pub fn parse_port(
    input: &str,
    reserved: &[u16],
    taken: &[(&str, u16)],
) -> std::result::Result<u16, String> {
    let port = match input.trim().parse::<u16>() {
        Ok(p) if p > 0 => p,
        _ => return Err("Please enter a valid port number (1-65535).".to_string()),
    };

    if reserved.contains(&port) {
        let list = reserved
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(format!(
            "Port is already in use. Please choose a different port than {list}."
        ));
    }

    if let Some((label, _)) = taken.iter().find(|(_, p)| *p == port) {
        return Err(format!(
            "Port must be different from the {label} port ({port})."
        ));
    }

    Ok(port)
}

/// Ask every field in order and apply accepted values to `env`.
pub fn run(
    questionnaire: &Questionnaire,
    prompter: &mut dyn Prompter,
    env: &mut EnvFile,
) -> Result<Answers> {
    debug!(
        keys = ?env.entries().into_iter().map(|(k, _)| k).collect::<Vec<_>>(),
        "env template"
    );

    let mut answers = Answers::new();

    for field in &questionnaire.fields {
        let Some(value) = ask(field, prompter, &answers)? else {
            debug!(key = field.key, "skipped");
            continue;
        };

        if env.set(field.key, &value) {
            info!(key = field.key, "updated env value");
        } else {
            warn!(key = field.key, "key not present in env template, left unchanged");
        }
        answers.insert(field.key.to_string(), value);
    }

    Ok(answers)
}

fn ask(field: &Field, prompter: &mut dyn Prompter, answers: &Answers) -> Result<Option<String>> {
    match &field.kind {
        FieldKind::Text {
            message,
            default,
            empty_error,
        } => {
            let empty_error = *empty_error;
            let validator: Validator = Arc::new(move |input: &str| validate_not_empty(input, empty_error));
            let value = prompter.text(message, *default, validator)?;
            Ok(Some(value.trim().to_string()))
        }
        FieldKind::Port {
            message,
            default,
            reserved,
            distinct_from,
        } => {
            let reserved = *reserved;
            let taken: Vec<(&'static str, u16)> = distinct_from
                .iter()
                .filter_map(|(key, label)| {
                    answers
                        .get(*key)
                        .and_then(|v| v.parse::<u16>().ok())
                        .map(|p| (*label, p))
                })
                .collect();
            let checked = taken.clone();
            let validator: Validator =
                Arc::new(move |input: &str| validate_port(input, reserved, &checked));
            let default = default.to_string();
            let value = prompter.text(message, Some(&default), validator)?;
            let port = parse_port(&value, reserved, &taken).map_err(SetupError::Prompt)?;
            Ok(Some(port.to_string()))
        }
        FieldKind::Secret { message } => {
            if prompter.confirm(message, true)? {
                Ok(Some(generate_secret()))
            } else {
                Ok(None)
            }
        }
        FieldKind::Derived(compute) => Ok(compute(answers)),
    }
}
