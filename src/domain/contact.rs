use crate::domain::rut::{Rut, Strictness};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

pub const COUNTRY_PREFIX: &str = "+56";
const PHONE_DIGITS: usize = 9;
const POSTAL_DIGITS: usize = 7;

/// Official region names with the short forms people actually type.
pub const REGIONES: &[(&str, &[&str])] = &[
    ("Arica y Parinacota", &["arica", "xv"]),
    ("Tarapacá", &["i"]),
    ("Antofagasta", &["ii"]),
    ("Atacama", &["iii"]),
    ("Coquimbo", &["iv"]),
    ("Valparaíso", &["v"]),
    ("Metropolitana de Santiago", &["metropolitana", "santiago", "rm", "xiii"]),
    ("Libertador General Bernardo O'Higgins", &["o'higgins", "ohiggins", "vi"]),
    ("Maule", &["vii"]),
    ("Ñuble", &["xvi"]),
    ("Biobío", &["bio bio", "viii"]),
    ("La Araucanía", &["araucania", "ix"]),
    ("Los Ríos", &["xiv"]),
    ("Los Lagos", &["x"]),
    ("Aysén del General Carlos Ibáñez del Campo", &["aysen", "aisen", "xi"]),
    ("Magallanes y de la Antártica Chilena", &["magallanes", "xii"]),
];

/// Postal address. The same shape serves raw input and the validated value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direccion {
    #[serde(default)]
    pub calle: String,
    #[serde(default)]
    pub numero: String,
    #[serde(default)]
    pub comuna: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postal: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub complemento: String,
}

impl Direccion {
    /// `calle numero, complemento, comuna, region, postal`, skipping blanks.
    pub fn one_line(&self) -> String {
        let street = [self.calle.trim(), self.numero.trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        [
            street.as_str(),
            self.complemento.trim(),
            self.comuna.trim(),
            self.region.trim(),
            self.postal.trim(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    #[serde(default)]
    pub rut: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub direccion: Direccion,
    #[serde(default)]
    pub unidad_negocio: String,
}

/// A validated record, serialized as the webhook body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub rut: Rut,
    pub email: String,
    pub telefono: String,
    pub direccion: Direccion,
    pub unidad_negocio: String,
}

/// Per-field validation messages, keyed by the JSON path of the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(BTreeMap<&'static str, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        f.write_str(&parts.join("; "))
    }
}

pub fn normalize_email(raw: &str) -> Result<String, &'static str> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err("Ingrese su correo electrónico");
    }
    if !EMAIL_RE.is_match(&email) {
        return Err("El correo electrónico no es válido");
    }
    Ok(email)
}

/// Normalizes a Chilean phone number to `+56XXXXXXXXX`.
pub fn normalize_phone(raw: &str) -> Result<String, &'static str> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    if compact.is_empty() {
        return Err("Ingrese su teléfono");
    }

    let local = compact
        .strip_prefix(COUNTRY_PREFIX)
        .or_else(|| {
            (compact.len() == PHONE_DIGITS + 2)
                .then(|| compact.strip_prefix("56"))
                .flatten()
        })
        .unwrap_or(&compact);

    if local.len() != PHONE_DIGITS || !local.chars().all(|c| c.is_ascii_digit()) {
        return Err("El teléfono debe tener 9 dígitos, por ejemplo +56 9 1234 5678");
    }
    if local.starts_with('0') || local.starts_with('1') {
        return Err("El teléfono debe comenzar con un dígito entre 2 y 9");
    }

    Ok(format!("{}{}", COUNTRY_PREFIX, local))
}

/// `+56912345678` -> `+56 9 1234 5678`. Anything else is returned unchanged.
pub fn pretty_phone(normalized: &str) -> String {
    match normalized.strip_prefix(COUNTRY_PREFIX) {
        Some(local) if local.len() == PHONE_DIGITS && local.is_ascii() => format!(
            "{} {} {} {}",
            COUNTRY_PREFIX,
            &local[..1],
            &local[1..5],
            &local[5..]
        ),
        _ => normalized.to_string(),
    }
}

fn fold(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            '-' => ' ',
            other => other,
        })
        .collect()
}

/// Maps free text to the official region name.
pub fn canonical_region(raw: &str) -> Option<&'static str> {
    let mut needle = fold(raw);
    for prefix in ["region del ", "region de ", "region "] {
        if let Some(rest) = needle.strip_prefix(prefix) {
            needle = rest.to_string();
            break;
        }
    }
    if needle.is_empty() {
        return None;
    }

    REGIONES
        .iter()
        .find(|(name, aliases)| fold(name) == needle || aliases.iter().any(|a| *a == needle))
        .map(|(name, _)| *name)
}

pub fn validate_postal(raw: &str) -> Result<String, &'static str> {
    let postal = raw.trim();
    if postal.is_empty() {
        return Ok(String::new());
    }
    if postal.len() != POSTAL_DIGITS || !postal.chars().all(|c| c.is_ascii_digit()) {
        return Err("El código postal debe tener 7 dígitos");
    }
    Ok(postal.to_string())
}

fn required(
    errors: &mut FormErrors,
    field: &'static str,
    value: &str,
    message: &'static str,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, message);
    }
    value.to_string()
}

impl ContactDraft {
    /// Validates every field and reports all failures at once.
    pub fn validate(&self, strictness: Strictness) -> Result<ContactRecord, FormErrors> {
        let mut errors = FormErrors::new();

        let rut = Rut::parse(&self.rut, strictness)
            .map_err(|e| errors.add("rut", e.to_string()))
            .ok();
        let email = normalize_email(&self.email)
            .map_err(|e| errors.add("email", e))
            .ok();
        let telefono = normalize_phone(&self.telefono)
            .map_err(|e| errors.add("telefono", e))
            .ok();
        let direccion = self.direccion.validate(&mut errors);
        let unidad_negocio = required(
            &mut errors,
            "unidad_negocio",
            &self.unidad_negocio,
            "Falta la unidad de negocio",
        );

        match (rut, email, telefono) {
            (Some(rut), Some(email), Some(telefono)) if errors.is_empty() => Ok(ContactRecord {
                rut,
                email,
                telefono,
                direccion,
                unidad_negocio,
            }),
            _ => Err(errors),
        }
    }
}

impl Direccion {
    fn validate(&self, errors: &mut FormErrors) -> Direccion {
        let calle = required(errors, "direccion.calle", &self.calle, "Ingrese la calle");
        let numero = required(errors, "direccion.numero", &self.numero, "Ingrese el número");
        let comuna = required(errors, "direccion.comuna", &self.comuna, "Ingrese la comuna");

        let region = if self.region.trim().is_empty() {
            errors.add("direccion.region", "Seleccione una región");
            String::new()
        } else {
            match canonical_region(&self.region) {
                Some(name) => name.to_string(),
                None => {
                    errors.add("direccion.region", "La región no existe");
                    self.region.trim().to_string()
                }
            }
        };

        let postal = validate_postal(&self.postal).unwrap_or_else(|e| {
            errors.add("direccion.postal", e);
            self.postal.trim().to_string()
        });

        Direccion {
            calle,
            numero,
            comuna,
            region,
            postal,
            complemento: self.complemento.trim().to_string(),
        }
    }
}
