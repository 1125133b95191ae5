//! Utilidades de validación
//!
//! Funciones helper y expresiones regulares para validar los formatos
//! de documentos brasileños (CPF/CNPJ, CEP) y matrículas.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// CPF (11 dígitos) o CNPJ (14 dígitos), con o sin puntuación
    pub static ref TAX_ID_RE: Regex =
        Regex::new(r"^(\d{3}\.?\d{3}\.?\d{3}-?\d{2}|\d{2}\.?\d{3}\.?\d{3}/?\d{4}-?\d{2})$")
            .unwrap();

    /// Código postal CEP: 00000-000 o 00000000
    pub static ref POSTAL_CODE_RE: Regex = Regex::new(r"^\d{5}-?\d{3}$").unwrap();

    /// Matrícula en formato antiguo (AAA1234) o Mercosur (AAA1A23)
    pub static ref PLATE_RE: Regex =
        Regex::new(r"^[A-Z]{3}-?\d[A-Z0-9]\d{2}$").unwrap();
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar categoría de licencia de conducir (B, C, D o E)
pub fn validate_license_category(value: &str) -> Result<(), ValidationError> {
    match value {
        "B" | "C" | "D" | "E" => Ok(()),
        _ => {
            let mut error = ValidationError::new("license_category");
            error.add_param("value".into(), &value.to_string());
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_cpf_and_cnpj() {
        assert!(TAX_ID_RE.is_match("123.456.789-00"));
        assert!(TAX_ID_RE.is_match("12345678900"));
        assert!(TAX_ID_RE.is_match("12.345.678/0001-99"));
        assert!(!TAX_ID_RE.is_match("123"));
    }

    #[test]
    fn accepts_postal_codes() {
        assert!(POSTAL_CODE_RE.is_match("01310-100"));
        assert!(POSTAL_CODE_RE.is_match("01310100"));
        assert!(!POSTAL_CODE_RE.is_match("1310-100"));
    }

    #[test]
    fn accepts_old_and_mercosur_plates() {
        assert!(PLATE_RE.is_match("ABC1234"));
        assert!(PLATE_RE.is_match("ABC-1234"));
        assert!(PLATE_RE.is_match("ABC1D23"));
        assert!(!PLATE_RE.is_match("AB12345"));
    }

    #[test]
    fn license_categories() {
        assert!(validate_license_category("B").is_ok());
        assert!(validate_license_category("E").is_ok());
        assert!(validate_license_category("A").is_err());
    }
}
