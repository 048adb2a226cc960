use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::constants::messages;
pub use crate::entities::users::AccountKind;
use crate::entities::users::Model as UserRow;

const MAX_AGE: i32 = 130;

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"))
        .is_match(email)
}

/// Fields that must be unique across all accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Username,
    LicenseNumber,
}

impl UniqueField {
    #[must_use]
    pub const fn conflict_message(self) -> &'static str {
        match self {
            Self::Email => messages::EMAIL_TAKEN,
            Self::Username => messages::USERNAME_TAKEN,
            Self::LicenseNumber => messages::LICENSE_TAKEN,
        }
    }

    /// Recovers the colliding column from a driver's unique-violation message.
    ///
    /// Postgres reports the constraint (`users_email_key`), `SQLite` the column
    /// (`UNIQUE constraint failed: users.email`); both carry the column name.
    #[must_use]
    pub fn from_constraint_message(message: &str) -> Option<Self> {
        if message.contains("license_number") {
            Some(Self::LicenseNumber)
        } else if message.contains("username") {
            Some(Self::Username)
        } else if message.contains("email") {
            Some(Self::Email)
        } else {
            None
        }
    }
}

/// Age arrives as a number from JSON clients and as text from HTML forms.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AgeInput {
    Number(i64),
    Text(String),
}

impl AgeInput {
    pub fn parse(&self) -> Result<Option<i32>, String> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) if s.trim().is_empty() => return Ok(None),
            Self::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| "Idade inválida.".to_string())?,
        };

        i32::try_from(value)
            .ok()
            .filter(|age| (0..=MAX_AGE).contains(age))
            .map(Some)
            .ok_or_else(|| "Idade inválida.".to_string())
    }
}

/// Raw registration body; which fields are required depends on `tipo`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RegisterRequest {
    pub tipo: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub nome_completo: Option<String>,
    pub crp: Option<String>,
    pub idade: Option<AgeInput>,
    pub sexo: Option<String>,
    pub area_atuacao: Option<String>,
    pub contato: Option<String>,
    pub bio: Option<String>,
}

impl AccountKind {
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim() {
            "paciente" => Some(Self::Patient),
            "profissional" => Some(Self::Professional),
            _ => None,
        }
    }

    /// Body fields a registration of this kind must carry.
    #[must_use]
    pub const fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Patient => &["username", "email", "password"],
            Self::Professional => &["nome_completo", "crp", "email", "password"],
        }
    }
}

/// Professional-only attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfessionalDetails {
    pub full_name: String,
    pub license_number: String,
    pub age: Option<i32>,
    pub sex: Option<String>,
    pub practice_area: Option<String>,
    pub contact: Option<String>,
    pub bio: Option<String>,
}

/// A validated registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Patient {
        username: String,
        email: String,
        password: String,
    },
    Professional {
        email: String,
        password: String,
        details: ProfessionalDetails,
    },
}

impl Registration {
    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::Patient { email, .. } | Self::Professional { email, .. } => email,
        }
    }

    #[must_use]
    pub fn password(&self) -> &str {
        match self {
            Self::Patient { password, .. } | Self::Professional { password, .. } => password,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> AccountKind {
        match self {
            Self::Patient { .. } => AccountKind::Patient,
            Self::Professional { .. } => AccountKind::Professional,
        }
    }
}

fn trimmed(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn owned(value: Option<&String>) -> Option<String> {
    trimmed(value).map(str::to_string)
}

impl RegisterRequest {
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "username" => self.username.as_ref(),
            "email" => self.email.as_ref(),
            "password" => self.password.as_ref(),
            "nome_completo" => self.nome_completo.as_ref(),
            "crp" => self.crp.as_ref(),
            _ => None,
        };
        // Passwords keep their whitespace; blank ones still count as missing.
        if name == "password" {
            value.map(String::as_str).filter(|s| !s.trim().is_empty())
        } else {
            trimmed(value)
        }
    }

    /// Checks the body against the required-field table for its declared kind.
    pub fn validate(&self) -> Result<Registration, String> {
        let kind_raw = trimmed(self.tipo.as_ref()).ok_or(messages::MISSING_FIELDS)?;
        let kind = AccountKind::from_wire(kind_raw).ok_or(messages::UNKNOWN_ACCOUNT_KIND)?;

        if kind
            .required_fields()
            .iter()
            .any(|name| self.field(name).is_none())
        {
            return Err(messages::MISSING_FIELDS.to_string());
        }

        let email = self.field("email").unwrap_or_default().to_lowercase();
        if !is_valid_email(&email) {
            return Err(messages::INVALID_EMAIL.to_string());
        }
        let password = self.field("password").unwrap_or_default().to_string();

        match kind {
            AccountKind::Patient => {
                let username = self.field("username").unwrap_or_default();
                // Logins containing '@' are resolved as emails
                if username.contains('@') {
                    return Err(messages::INVALID_USERNAME.to_string());
                }
                Ok(Registration::Patient {
                    username: username.to_string(),
                    email,
                    password,
                })
            }
            AccountKind::Professional => {
                let age = match &self.idade {
                    Some(input) => input.parse()?,
                    None => None,
                };
                Ok(Registration::Professional {
                    email,
                    password,
                    details: ProfessionalDetails {
                        full_name: self.field("nome_completo").unwrap_or_default().to_string(),
                        license_number: self.field("crp").unwrap_or_default().to_string(),
                        age,
                        sex: owned(self.sexo.as_ref()),
                        practice_area: owned(self.area_atuacao.as_ref()),
                        contact: owned(self.contato.as_ref()),
                        bio: owned(self.bio.as_ref()),
                    },
                })
            }
        }
    }
}

/// Mutable attributes of a professional account; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfessionalUpdateRequest {
    pub id: Option<i32>,
    pub nome_completo: Option<String>,
    pub idade: Option<AgeInput>,
    pub sexo: Option<String>,
    pub area_atuacao: Option<String>,
    pub contato: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfessionalUpdate {
    pub id: i32,
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub sex: Option<String>,
    pub practice_area: Option<String>,
    pub contact: Option<String>,
    pub bio: Option<String>,
}

impl ProfessionalUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.age.is_none()
            && self.sex.is_none()
            && self.practice_area.is_none()
            && self.contact.is_none()
            && self.bio.is_none()
    }
}

impl ProfessionalUpdateRequest {
    pub fn validate(&self) -> Result<ProfessionalUpdate, String> {
        let id = self.id.ok_or(messages::MISSING_FIELDS)?;
        let age = match &self.idade {
            Some(input) => input.parse()?,
            None => None,
        };

        let update = ProfessionalUpdate {
            id,
            full_name: owned(self.nome_completo.as_ref()),
            age,
            sex: owned(self.sexo.as_ref()),
            practice_area: owned(self.area_atuacao.as_ref()),
            contact: owned(self.contato.as_ref()),
            bio: owned(self.bio.as_ref()),
        };

        if update.is_empty() {
            return Err(messages::NOTHING_TO_UPDATE.to_string());
        }
        Ok(update)
    }
}

/// What a successful login hands back to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfileView {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub tipo: AccountKind,
    pub resumo_pre_avaliacao: Option<String>,
}

impl From<UserRow> for ProfileView {
    fn from(row: UserRow) -> Self {
        let nome = match row.kind {
            AccountKind::Patient => row.username,
            AccountKind::Professional => row.full_name,
        }
        .unwrap_or_default();

        Self {
            id: row.id,
            nome,
            email: row.email,
            tipo: row.kind,
            resumo_pre_avaliacao: row.assessment_summary,
        }
    }
}

/// Public directory entry of a professional; never carries credentials or email.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfessionalProfile {
    pub id: i32,
    #[serde(rename = "nome_completo")]
    pub full_name: Option<String>,
    #[serde(rename = "crp")]
    pub license_number: Option<String>,
    #[serde(rename = "idade")]
    pub age: Option<i32>,
    #[serde(rename = "sexo")]
    pub sex: Option<String>,
    #[serde(rename = "area_atuacao")]
    pub practice_area: Option<String>,
    #[serde(rename = "contato")]
    pub contact: Option<String>,
    pub bio: Option<String>,
}

impl From<UserRow> for ProfessionalProfile {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            license_number: row.license_number,
            age: row.age,
            sex: row.sex,
            practice_area: row.practice_area,
            contact: row.contact,
            bio: row.bio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient_request() -> RegisterRequest {
        RegisterRequest {
            tipo: Some("paciente".to_string()),
            username: Some("ana".to_string()),
            email: Some("A@X.com".to_string()),
            password: Some("x".to_string()),
            ..RegisterRequest::default()
        }
    }

    fn professional_request() -> RegisterRequest {
        RegisterRequest {
            tipo: Some("profissional".to_string()),
            email: Some("dra@clinica.com".to_string()),
            password: Some("segredo".to_string()),
            nome_completo: Some("Dra. Beatriz Lima".to_string()),
            crp: Some("06/123456".to_string()),
            idade: Some(AgeInput::Text("41".to_string())),
            ..RegisterRequest::default()
        }
    }

    #[test]
    fn test_patient_registration() {
        let registration = patient_request().validate().unwrap();
        assert_eq!(
            registration,
            Registration::Patient {
                username: "ana".to_string(),
                email: "a@x.com".to_string(),
                password: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_professional_registration() {
        let registration = professional_request().validate().unwrap();
        let Registration::Professional { details, .. } = registration else {
            panic!("expected professional registration");
        };
        assert_eq!(details.full_name, "Dra. Beatriz Lima");
        assert_eq!(details.license_number, "06/123456");
        assert_eq!(details.age, Some(41));
        assert!(details.bio.is_none());
    }

    #[test]
    fn test_required_fields_follow_kind() {
        let mut request = patient_request();
        request.username = Some("   ".to_string());
        assert_eq!(request.validate().unwrap_err(), messages::MISSING_FIELDS);

        // A patient body does not satisfy the professional table
        let mut request = patient_request();
        request.tipo = Some("profissional".to_string());
        assert_eq!(request.validate().unwrap_err(), messages::MISSING_FIELDS);

        let mut request = professional_request();
        request.crp = None;
        assert_eq!(request.validate().unwrap_err(), messages::MISSING_FIELDS);
    }

    #[test]
    fn test_kind_errors() {
        let mut request = patient_request();
        request.tipo = None;
        assert_eq!(request.validate().unwrap_err(), messages::MISSING_FIELDS);

        request.tipo = Some("admin".to_string());
        assert_eq!(request.validate().unwrap_err(), messages::UNKNOWN_ACCOUNT_KIND);
    }

    #[test]
    fn test_username_rejects_at_sign() {
        let mut request = patient_request();
        request.username = Some("outra@example.com".to_string());
        assert_eq!(request.validate().unwrap_err(), messages::INVALID_USERNAME);
    }

    #[test]
    fn test_invalid_email() {
        let mut request = patient_request();
        request.email = Some("not-an-email".to_string());
        assert_eq!(request.validate().unwrap_err(), messages::INVALID_EMAIL);
    }

    #[test]
    fn test_email_check() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last+tag@sub.domain.org"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("a x@y.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_age_input() {
        assert_eq!(AgeInput::Number(30).parse().unwrap(), Some(30));
        assert_eq!(AgeInput::Text(" 52 ".to_string()).parse().unwrap(), Some(52));
        assert_eq!(AgeInput::Text(String::new()).parse().unwrap(), None);
        assert!(AgeInput::Number(-1).parse().is_err());
        assert!(AgeInput::Number(400).parse().is_err());
        assert!(AgeInput::Text("trinta".to_string()).parse().is_err());
    }

    #[test]
    fn test_unique_field_from_constraint() {
        assert_eq!(
            UniqueField::from_constraint_message("UNIQUE constraint failed: users.email"),
            Some(UniqueField::Email)
        );
        assert_eq!(
            UniqueField::from_constraint_message(
                "duplicate key value violates unique constraint \"users_license_number_key\""
            ),
            Some(UniqueField::LicenseNumber)
        );
        assert_eq!(
            UniqueField::from_constraint_message("users_username_key"),
            Some(UniqueField::Username)
        );
        assert_eq!(UniqueField::from_constraint_message("users_pkey"), None);
    }

    #[test]
    fn test_professional_update_needs_a_field() {
        let request = ProfessionalUpdateRequest {
            id: Some(3),
            ..ProfessionalUpdateRequest::default()
        };
        assert_eq!(request.validate().unwrap_err(), messages::NOTHING_TO_UPDATE);

        let request = ProfessionalUpdateRequest {
            bio: Some("Terapia cognitivo-comportamental".to_string()),
            ..ProfessionalUpdateRequest::default()
        };
        assert_eq!(request.validate().unwrap_err(), messages::MISSING_FIELDS);

        let request = ProfessionalUpdateRequest {
            id: Some(3),
            area_atuacao: Some("Ansiedade".to_string()),
            ..ProfessionalUpdateRequest::default()
        };
        let update = request.validate().unwrap();
        assert_eq!(update.id, 3);
        assert_eq!(update.practice_area.as_deref(), Some("Ansiedade"));
    }
}
