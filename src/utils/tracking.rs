//! Generación de códigos de rastreo

use uuid::Uuid;

/// Genera un código de rastreo único de 8 caracteres en mayúsculas
pub fn generate_tracking_code() -> String {
    Uuid::new_v4().to_string()[..8].to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_eight_uppercase_chars() {
        let code = generate_tracking_code();
        assert_eq!(code.len(), 8);
        assert_eq!(code, code.to_uppercase());
    }

    #[test]
    fn codes_are_unique_enough() {
        let a = generate_tracking_code();
        let b = generate_tracking_code();
        assert_ne!(a, b);
    }
}
