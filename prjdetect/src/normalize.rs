//! Normalisation du texte PRJ avant comparaison

/// Normalise un texte PRJ : espaces fusionnés, majuscules, guillemets unifiés.
///
/// Le texte d'origine n'est jamais modifié, une nouvelle chaîne est renvoyée.
pub fn normalize_prj(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            result.push(' ');
            pending_space = false;
        }
        match c {
            '\'' | '`' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' | '\u{00AB}'
            | '\u{00BB}' => result.push('"'),
            c => result.extend(c.to_uppercase()),
        }
    }

    result
}
