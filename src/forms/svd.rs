//! Raw submissions of the SVD device and peripheral editors.
//!
//! The editors post a dynamic set of keys (`cpu.name`, `interrupts`, ...), so
//! the body is kept as ordered pairs instead of a fixed struct.

use crate::forms::FormError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SvdEditForm {
    pub pairs: Vec<(String, String)>,
}

impl SvdEditForm {
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        let pairs = serde_html_form::from_bytes(body)
            .map_err(|err| FormError::Malformed(err.to_string()))?;
        Ok(Self { pairs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_repeated_keys() {
        let form = SvdEditForm::parse(b"name=ARM&interrupts=TIMER0&interrupts=TIMER1&cpu.name=CM3")
            .unwrap();
        assert_eq!(
            form.pairs,
            vec![
                ("name".to_string(), "ARM".to_string()),
                ("interrupts".to_string(), "TIMER0".to_string()),
                ("interrupts".to_string(), "TIMER1".to_string()),
                ("cpu.name".to_string(), "CM3".to_string()),
            ]
        );
    }
}
