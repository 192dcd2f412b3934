use crate::domain::contact::{
    canonical_region, normalize_email, normalize_phone, pretty_phone, validate_postal,
    ContactDraft, ContactRecord, Direccion,
};
use crate::domain::rut::{self, RutInputState, Strictness};
use std::fmt::Write;

const VALID: char = '✓';
const INVALID: char = '✗';
const EMPTY: char = '·';

fn line(out: &mut String, marker: char, label: &str, value: &str) {
    let _ = writeln!(out, "{} {:<10} {}", marker, label, value);
}

fn rut_marker(raw: &str, strictness: Strictness) -> char {
    match RutInputState::of(raw, strictness) {
        RutInputState::Empty | RutInputState::Incomplete => EMPTY,
        RutInputState::Valid(_) => VALID,
        RutInputState::Invalid(_) => INVALID,
    }
}

fn field_marker<T, E>(raw: &str, check: impl Fn(&str) -> Result<T, E>) -> char {
    if raw.trim().is_empty() {
        EMPTY
    } else if check(raw).is_ok() {
        VALID
    } else {
        INVALID
    }
}

fn address_marker(dir: &Direccion) -> char {
    let required = [&dir.calle, &dir.numero, &dir.comuna, &dir.region];
    if required.iter().all(|s| s.trim().is_empty()) {
        return EMPTY;
    }
    let complete = required.iter().all(|s| !s.trim().is_empty())
        && canonical_region(&dir.region).is_some()
        && validate_postal(&dir.postal).is_ok();
    if complete {
        VALID
    } else {
        INVALID
    }
}

/// Live view of the form while it is being filled in.
pub fn render_summary(draft: &ContactDraft, strictness: Strictness) -> String {
    let mut out = String::new();

    line(
        &mut out,
        rut_marker(&draft.rut, strictness),
        "RUT",
        &rut::format(&draft.rut),
    );
    line(
        &mut out,
        field_marker(&draft.email, normalize_email),
        "Email",
        draft.email.trim(),
    );

    let phone = match normalize_phone(&draft.telefono) {
        Ok(normalized) => pretty_phone(&normalized),
        Err(_) => draft.telefono.trim().to_string(),
    };
    line(
        &mut out,
        field_marker(&draft.telefono, normalize_phone),
        "Teléfono",
        &phone,
    );

    line(
        &mut out,
        address_marker(&draft.direccion),
        "Dirección",
        &draft.direccion.one_line(),
    );

    let unit = draft.unidad_negocio.trim();
    line(
        &mut out,
        if unit.is_empty() { EMPTY } else { VALID },
        "Unidad",
        unit,
    );

    out
}

/// Confirmation text for a record that passed validation.
pub fn render_record(record: &ContactRecord) -> String {
    let mut out = String::new();
    line(&mut out, VALID, "RUT", &record.rut.to_dotted());
    line(&mut out, VALID, "Email", &record.email);
    line(&mut out, VALID, "Teléfono", &pretty_phone(&record.telefono));
    line(&mut out, VALID, "Dirección", &record.direccion.one_line());
    line(&mut out, VALID, "Unidad", &record.unidad_negocio);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_draft_shows_empty_markers() {
        let summary = render_summary(&ContactDraft::default(), Strictness::Strict);
        assert_eq!(summary.lines().count(), 5);
        assert!(summary.lines().all(|l| l.starts_with(EMPTY)));
    }

    #[test]
    fn test_partial_draft_marks_each_field() {
        let draft = ContactDraft {
            rut: "123456785".to_string(),
            email: "bad@".to_string(),
            telefono: "912345678".to_string(),
            direccion: Direccion {
                calle: "Merced".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let summary = render_summary(&draft, Strictness::Strict);
        let lines: Vec<&str> = summary.lines().collect();

        assert!(lines[0].starts_with(VALID));
        assert!(lines[0].ends_with("12345678-5"));
        assert!(lines[1].starts_with(INVALID));
        assert!(lines[2].ends_with("+56 9 1234 5678"));
        assert!(lines[3].starts_with(INVALID));
        assert!(lines[3].ends_with("Merced"));
        assert!(lines[4].starts_with(EMPTY));
    }

    #[test]
    fn test_rut_marker_agrees_with_validation() {
        for raw in ["12345678-5999", "1234K5678", "12345678-4"] {
            let draft = ContactDraft {
                rut: raw.to_string(),
                ..Default::default()
            };
            let summary = render_summary(&draft, Strictness::Strict);
            let first = summary.lines().next().unwrap();

            assert!(!rut::validate(raw, Strictness::Strict).valid);
            assert!(first.starts_with(INVALID), "{:?} rendered as {:?}", raw, first);
            assert!(first.ends_with(&rut::format(raw)));
        }
    }

    #[test]
    fn test_business_unit_line() {
        let draft = ContactDraft {
            unidad_negocio: " retail ".to_string(),
            ..Default::default()
        };
        let summary = render_summary(&draft, Strictness::Strict);
        let last = summary.lines().last().unwrap();
        assert!(last.starts_with(VALID));
        assert!(last.ends_with("retail"));
    }

    #[test]
    fn test_short_rut_is_not_flagged_yet() {
        let draft = ContactDraft {
            rut: "1234".to_string(),
            ..Default::default()
        };
        let summary = render_summary(&draft, Strictness::Strict);
        assert!(summary.starts_with(EMPTY));
        assert!(summary.lines().next().unwrap().ends_with("123-4"));
    }

    #[test]
    fn test_render_record() {
        let draft = ContactDraft {
            rut: "7654321-6".to_string(),
            email: "ana@correo.cl".to_string(),
            telefono: "+56 2 2345 6789".to_string(),
            direccion: Direccion {
                calle: "Prat".to_string(),
                numero: "10".to_string(),
                comuna: "Iquique".to_string(),
                region: "tarapaca".to_string(),
                ..Default::default()
            },
            unidad_negocio: "norte".to_string(),
        };
        let record = draft.validate(Strictness::Strict).unwrap();
        let text = render_record(&record);
        assert!(text.contains("7.654.321-6"));
        assert!(text.contains("+56 2 2345 6789"));
        assert!(text.contains("Prat 10, Iquique, Tarapacá"));
        assert!(text.contains("norte"));
    }
}
