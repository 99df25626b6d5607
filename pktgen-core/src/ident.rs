//! Packet name → enumerator identifier.

/// Convert a PascalCase or camelCase name into UPPER_SNAKE_CASE.
///
/// A separator goes before an uppercase letter when
/// - it opens a capitalised word (`[A-Z][a-z]+`) and is not the first
///   character, or
/// - the previous character is a lowercase letter or a digit.
///
/// An existing `_` is never doubled. Letters followed by digits stay joined:
/// `Packet2` → `PACKET2`, while `Packet2Data` → `PACKET2_DATA` and
/// `HTTPServer` → `HTTP_SERVER`.
pub fn to_upper_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + name.len() / 2);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let opens_word = chars.get(i + 1).is_some_and(|next| next.is_lowercase());
            let after_lower_or_digit = prev.is_lowercase() || prev.is_ascii_digit();
            if prev != '_' && (opens_word || after_lower_or_digit) {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_words() {
        assert_eq!(to_upper_snake("HelloWorld"), "HELLO_WORLD");
        assert_eq!(to_upper_snake("PingPacket"), "PING_PACKET");
        assert_eq!(to_upper_snake("TestStringPacketReq"), "TEST_STRING_PACKET_REQ");
    }

    #[test]
    fn single_word_and_camel_case() {
        assert_eq!(to_upper_snake("Ping"), "PING");
        assert_eq!(to_upper_snake("helloWorld"), "HELLO_WORLD");
    }

    #[test]
    fn digits_adjacent_to_case_transitions() {
        assert_eq!(to_upper_snake("Packet2"), "PACKET2");
        assert_eq!(to_upper_snake("Packet2Data"), "PACKET2_DATA");
        assert_eq!(to_upper_snake("Vector3D"), "VECTOR3_D");
        assert_eq!(to_upper_snake("Http2Request"), "HTTP2_REQUEST");
        assert_eq!(to_upper_snake("Move3dReq"), "MOVE3D_REQ");
    }

    #[test]
    fn acronyms_split_before_last_capital() {
        assert_eq!(to_upper_snake("HTTPServer"), "HTTP_SERVER");
        assert_eq!(to_upper_snake("GetHTTP"), "GET_HTTP");
        assert_eq!(to_upper_snake("ID"), "ID");
    }

    #[test]
    fn existing_underscores_are_not_doubled() {
        assert_eq!(to_upper_snake("Foo_Bar"), "FOO_BAR");
        assert_eq!(to_upper_snake("ALREADY_SNAKE"), "ALREADY_SNAKE");
    }
}
