//! Cyrillic to Latin transliteration for page labels
//!
//! Russian letters map to the Latin spellings already used in the site's
//! legacy URLs (`семейный юрист` -> `semejnyj-jurist`). Hard and soft
//! signs become apostrophes, which slug generation later drops.

fn lower(ch: char) -> Option<&'static str> {
    let mapped = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "'",
        'ы' => "y",
        'ю' => "ju",
        'я' => "ja",
        _ => return None,
    };
    Some(mapped)
}

/// Transliterate Russian text to Latin.
///
/// Characters outside the Cyrillic table pass through unchanged.
/// Uppercase Cyrillic letters are transliterated with a capitalised
/// first Latin letter.
pub fn to_latin(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        let lowered = ch.to_lowercase().next().unwrap_or(ch);
        match lower(lowered) {
            Some(latin) if lowered != ch => {
                let mut chars = latin.chars();
                if let Some(first) = chars.next() {
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                }
            }
            Some(latin) => out.push_str(latin),
            None => out.push(ch),
        }
    }
    out
}
