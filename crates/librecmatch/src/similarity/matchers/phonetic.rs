use any_ascii::any_ascii;
use librecmatch_macros::similarity_algorithm;
use rphonetic::{DoubleMetaphone, Encoder, Metaphone, Soundex};

use crate::{model::FieldConfig, similarity::Similarity};

/// Transliterated ASCII letters of a value, the only input the encoders accept.
fn letters(value: &str) -> String {
  any_ascii(value).chars().filter(char::is_ascii_alphabetic).collect()
}

/// Four-character American Soundex code, empty when the value has no letters.
pub(crate) fn soundex_code(value: &str) -> String {
  Soundex::default().encode(&letters(value))
}

// Values without any letter encode to an empty code, in which case we can
// only fall back to comparing them literally.
#[inline]
fn codes_match(lhs: &str, rhs: &str, lhs_code: &str, rhs_code: &str) -> bool {
  if lhs_code.is_empty() || rhs_code.is_empty() {
    return lhs == rhs;
  }

  lhs_code == rhs_code
}

#[similarity_algorithm(SoundexMatch, name = "soundex")]
fn similarity(&self, lhs: &str, rhs: &str, config: &FieldConfig) -> f64 {
  if codes_match(lhs, rhs, &soundex_code(lhs), &soundex_code(rhs)) { 1.0 } else { 0.0 }
}

#[similarity_algorithm(MetaphoneMatch, name = "metaphone")]
fn similarity(&self, lhs: &str, rhs: &str, config: &FieldConfig) -> f64 {
  let metaphone = Metaphone::default();
  let (lhs_letters, rhs_letters) = (letters(lhs), letters(rhs));

  if codes_match(lhs, rhs, &metaphone.encode(&lhs_letters), &metaphone.encode(&rhs_letters)) { 1.0 } else { 0.0 }
}

#[similarity_algorithm(DoubleMetaphoneMatch, name = "double-metaphone")]
fn similarity(&self, lhs: &str, rhs: &str, config: &FieldConfig) -> f64 {
  let encoder = DoubleMetaphone::default();
  let (lhs_letters, rhs_letters) = (letters(lhs), letters(rhs));

  let (lhs_primary, lhs_alternate) = (encoder.encode(&lhs_letters), encoder.encode_alternate(&lhs_letters));
  let (rhs_primary, rhs_alternate) = (encoder.encode(&rhs_letters), encoder.encode_alternate(&rhs_letters));

  let matched = codes_match(lhs, rhs, &lhs_primary, &rhs_primary)
    || codes_match(lhs, rhs, &lhs_primary, &rhs_alternate)
    || codes_match(lhs, rhs, &lhs_alternate, &rhs_primary)
    || codes_match(lhs, rhs, &lhs_alternate, &rhs_alternate);

  if matched { 1.0 } else { 0.0 }
}
