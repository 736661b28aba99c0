pub(crate) mod cosine;
pub(crate) mod exact;
pub(crate) mod fuzzy;
pub(crate) mod jaccard;
pub(crate) mod jaro_winkler;
pub(crate) mod levenshtein;
pub(crate) mod ngram;
pub(crate) mod phonetic;
pub(crate) mod token;
