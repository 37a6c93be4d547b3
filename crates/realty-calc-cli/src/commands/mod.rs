pub mod fair_price;
pub mod gap;
pub mod jeonse;
pub mod leads;
pub mod loan;
pub mod roi;

use realty_calc_core::{FieldValue, FormFields};

use crate::input;

/// Form values for a calculator: `--input` file first, then piped stdin,
/// then whatever individual flags were given.
pub(crate) fn read_form(
    input_path: Option<&str>,
    flags: FormFields,
) -> Result<FormFields, Box<dyn std::error::Error>> {
    if let Some(path) = input_path {
        return input::file::read_json(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    Ok(flags)
}

/// Collects the flags that were actually passed into a form map.
#[derive(Default)]
pub(crate) struct FlagForm(FormFields);

impl FlagForm {
    pub fn set<V: Into<FieldValue>>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.0.insert(name.to_string(), v.into());
        }
        self
    }

    pub fn into_fields(self) -> FormFields {
        self.0
    }
}
