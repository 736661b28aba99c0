use any_ascii::any_ascii;

use crate::{
  model::{FieldConfig, Preprocess},
  similarity::matchers::phonetic::soundex_code,
};

/// Run the configured preprocessing steps on a value, then fold case unless
/// the field is case-sensitive.
pub(crate) fn prepare(value: &str, config: &FieldConfig) -> String {
  let output = config.preprocessing.iter().fold(value.to_string(), |value, step| step.apply(&value));

  if config.case_sensitive { output } else { output.to_lowercase() }
}

impl Preprocess {
  pub fn apply(&self, value: &str) -> String {
    match self {
      Preprocess::Trim => value.trim().to_string(),
      Preprocess::Lowercase => value.to_lowercase(),
      Preprocess::RemovePunctuation => value.chars().filter(|c| c.is_alphanumeric() || c.is_whitespace()).collect(),
      Preprocess::AsciiFold => any_ascii(value),
      Preprocess::PhoneticFold => {
        let code = soundex_code(value);

        if code.is_empty() { value.to_string() } else { code }
      }
      Preprocess::Unknown => value.to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::model::{FieldConfig, Preprocess};

  #[test]
  fn steps() {
    assert_eq!(Preprocess::Trim.apply("  Alice \t"), "Alice");
    assert_eq!(Preprocess::Lowercase.apply("ALICE"), "alice");
    assert_eq!(Preprocess::RemovePunctuation.apply("O'Neil, Jr."), "ONeil Jr");
    assert_eq!(Preprocess::AsciiFold.apply("Zoë Müller"), "Zoe Muller");
    assert_eq!(Preprocess::PhoneticFold.apply("Robert"), "R163");
    assert_eq!(Preprocess::PhoneticFold.apply("1234"), "1234");
    assert_eq!(Preprocess::PhoneticFold.apply("Müller"), "M460");
    assert_eq!(Preprocess::PhoneticFold.apply("Ørsted"), Preprocess::PhoneticFold.apply("Orsted"));
    assert_eq!(Preprocess::PhoneticFold.apply("José"), Preprocess::PhoneticFold.apply("Jose"));
    assert_eq!(Preprocess::PhoneticFold.apply("日本語"), Preprocess::PhoneticFold.apply("Ribenyu"));
    assert_eq!(Preprocess::Unknown.apply(" As Is "), " As Is ");
  }

  #[test]
  fn pipeline_order_and_case() {
    let config = FieldConfig::builder().field("name").preprocessing(vec![Preprocess::RemovePunctuation, Preprocess::Trim]).build();

    assert_eq!(super::prepare(" Dr. Who! ", &config), "dr who");

    let config = FieldConfig::builder().field("name").case_sensitive(true).preprocessing(vec![Preprocess::Trim]).build();

    assert_eq!(super::prepare(" Dr. Who ", &config), "Dr. Who");
  }
}
