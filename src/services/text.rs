/// Upper-cases the first letter of every alphabetic run and lower-cases the rest,
/// so `street food` becomes `Street Food` and `healthcare.hospital` becomes
/// `Healthcare.Hospital`.
pub fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut at_word_start = true;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                result.extend(ch.to_uppercase());
            } else {
                result.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(ch);
            at_word_start = true;
        }
    }

    result
}
