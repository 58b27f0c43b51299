//! Extraction of Digital Currency Address entries from the SDN XML.

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use screener_core::constants::{DIGITAL_CURRENCY_MARKER, UNKNOWN_ENTITY};
use screener_core::error::{Result, ScreenerError};
use screener_core::types::ExtractedAddress;

/// Which text node is currently being accumulated.
#[derive(Clone, Copy)]
enum Capture {
    FirstName,
    LastName,
    IdType,
    IdNumber,
}

/// Extracts every qualifying crypto-address triple from a raw SDN document.
///
/// Element names are matched by local name only, so the extractor works
/// regardless of the namespace prefix a given OFAC schema version declares.
/// Per `sdnEntry`, the entity name is the trimmed `firstName` and `lastName`
/// joined by a space (direct children only; `akaList` aliases are ignored),
/// falling back to "Unknown Entity". An `id` qualifies when its `idType`
/// contains the exact substring "Digital Currency Address" and its `idNumber`
/// is non-empty after trimming.
///
/// Fails with [`ScreenerError::Parse`] on ill-formed XML, including a byte
/// stream that carries no XML elements at all.
pub fn extract_addresses(document: &[u8]) -> Result<Vec<ExtractedAddress>> {
    let mut reader = Reader::from_reader(document);
    let mut buf = Vec::new();

    let mut out = Vec::new();
    let mut saw_element = false;

    // Per-entry state. `depth` counts nesting below the sdnEntry element so
    // that only direct children feed the name fields, matching how the
    // source schema attaches aliases under akaList.
    let mut in_entry = false;
    let mut depth = 0usize;
    let mut in_id_list = false;
    let mut in_id = false;
    let mut first_name = String::new();
    let mut last_name = String::new();
    let mut id_type = String::new();
    let mut id_number = String::new();
    let mut entry_ids: Vec<(String, String)> = Vec::new();
    let mut capture: Option<Capture> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                saw_element = true;
                let name = e.local_name();
                let name = name.as_ref();

                if !in_entry {
                    if name == b"sdnEntry" {
                        in_entry = true;
                        depth = 0;
                        in_id_list = false;
                        in_id = false;
                        first_name.clear();
                        last_name.clear();
                        entry_ids.clear();
                        capture = None;
                    }
                } else {
                    depth += 1;
                    capture = match (depth, name) {
                        (1, b"firstName") => {
                            first_name.clear();
                            Some(Capture::FirstName)
                        }
                        (1, b"lastName") => {
                            last_name.clear();
                            Some(Capture::LastName)
                        }
                        (1, b"idList") => {
                            in_id_list = true;
                            None
                        }
                        (2, b"id") if in_id_list => {
                            in_id = true;
                            id_type.clear();
                            id_number.clear();
                            None
                        }
                        (3, b"idType") if in_id => Some(Capture::IdType),
                        (3, b"idNumber") if in_id => Some(Capture::IdNumber),
                        _ => None,
                    };
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(c) = capture {
                    let text = t
                        .unescape()
                        .map_err(|e| ScreenerError::Parse(e.to_string()))?;
                    match c {
                        Capture::FirstName => first_name.push_str(&text),
                        Capture::LastName => last_name.push_str(&text),
                        Capture::IdType => id_type.push_str(&text),
                        Capture::IdNumber => id_number.push_str(&text),
                    }
                }
            }
            Ok(Event::End(e)) => {
                if in_entry {
                    let name = e.local_name();
                    let name = name.as_ref();

                    if depth == 0 {
                        if name == b"sdnEntry" {
                            finalize_entry(&first_name, &last_name, &mut entry_ids, &mut out);
                            in_entry = false;
                        }
                    } else {
                        if depth == 2 && in_id && name == b"id" {
                            entry_ids.push((
                                std::mem::take(&mut id_type),
                                std::mem::take(&mut id_number),
                            ));
                            in_id = false;
                        }
                        if depth == 1 && name == b"idList" {
                            in_id_list = false;
                        }
                        depth -= 1;
                        capture = None;
                    }
                }
            }
            Ok(Event::Empty(_)) => {
                saw_element = true;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ScreenerError::Parse(e.to_string())),
        }
        buf.clear();
    }

    if !saw_element {
        return Err(ScreenerError::Parse(
            "document contains no XML elements".into(),
        ));
    }

    debug!(addresses = out.len(), "Extracted crypto addresses");
    Ok(out)
}

/// Assembles the entity name and emits one triple per qualifying identifier.
fn finalize_entry(
    first_name: &str,
    last_name: &str,
    entry_ids: &mut Vec<(String, String)>,
    out: &mut Vec<ExtractedAddress>,
) {
    let mut name_parts = Vec::new();
    if !first_name.trim().is_empty() {
        name_parts.push(first_name.trim());
    }
    if !last_name.trim().is_empty() {
        name_parts.push(last_name.trim());
    }
    let entity = if name_parts.is_empty() {
        UNKNOWN_ENTITY.to_string()
    } else {
        name_parts.join(" ")
    };

    for (id_type, id_number) in entry_ids.drain(..) {
        if id_type.contains(DIGITAL_CURRENCY_MARKER) && !id_number.trim().is_empty() {
            out.push(ExtractedAddress {
                address: id_number.trim().to_string(),
                entity: entity.clone(),
                currency_label: id_type.trim().to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: (&str, &str), ids: &[(&str, &str)]) -> String {
        let mut s = String::from("<sdnEntry>");
        if !name.0.is_empty() {
            s.push_str(&format!("<firstName>{}</firstName>", name.0));
        }
        if !name.1.is_empty() {
            s.push_str(&format!("<lastName>{}</lastName>", name.1));
        }
        s.push_str("<idList>");
        for (id_type, id_number) in ids {
            s.push_str(&format!(
                "<id><idType>{}</idType><idNumber>{}</idNumber></id>",
                id_type, id_number
            ));
        }
        s.push_str("</idList></sdnEntry>");
        s
    }

    fn document(entries: &[String]) -> Vec<u8> {
        format!("<sdnList>{}</sdnList>", entries.concat()).into_bytes()
    }

    #[test]
    fn test_extracts_digital_currency_addresses() {
        let doc = document(&[entry(
            ("Ivan", "Petrov"),
            &[("Digital Currency Address - XBT", "1A2b3C4d")],
        )]);

        let triples = extract_addresses(&doc).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].address, "1A2b3C4d");
        assert_eq!(triples[0].entity, "Ivan Petrov");
        assert_eq!(triples[0].currency_label, "Digital Currency Address - XBT");
    }

    #[test]
    fn test_passport_ids_are_excluded() {
        let doc = document(&[entry(
            ("Ivan", "Petrov"),
            &[
                ("Passport", "AB1234567"),
                ("Digital Currency Address - ETH", "0xdead"),
            ],
        )]);

        let triples = extract_addresses(&doc).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].address, "0xdead");
    }

    #[test]
    fn test_blank_id_number_is_excluded() {
        let doc = document(&[entry(
            ("Ivan", "Petrov"),
            &[("Digital Currency Address - ETH", "   ")],
        )]);

        assert!(extract_addresses(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_marker_match_is_case_exact() {
        let doc = document(&[entry(
            ("Ivan", "Petrov"),
            &[("digital currency address - XBT", "1abc")],
        )]);

        assert!(extract_addresses(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_missing_names_default_to_unknown_entity() {
        let doc = document(&[entry(
            ("", ""),
            &[("Digital Currency Address - XMR", "4Abc")],
        )]);

        let triples = extract_addresses(&doc).unwrap();
        assert_eq!(triples[0].entity, "Unknown Entity");
    }

    #[test]
    fn test_last_name_only() {
        let doc = document(&[entry(
            ("", "Acme Exchange Ltd"),
            &[("Digital Currency Address - USDT", "0xfeed")],
        )]);

        let triples = extract_addresses(&doc).unwrap();
        assert_eq!(triples[0].entity, "Acme Exchange Ltd");
    }

    #[test]
    fn test_one_entity_many_addresses() {
        let doc = document(&[entry(
            ("Ivan", "Petrov"),
            &[
                ("Digital Currency Address - XBT", "1abc"),
                ("Digital Currency Address - ETH", "0xabc"),
                ("Digital Currency Address - XMR", "4abc"),
            ],
        )]);

        let triples = extract_addresses(&doc).unwrap();
        assert_eq!(triples.len(), 3);
        assert!(triples.iter().all(|t| t.entity == "Ivan Petrov"));
    }

    #[test]
    fn test_namespace_prefix_is_ignored() {
        let doc = br#"<?xml version="1.0"?>
            <sdn:sdnList xmlns:sdn="https://www.treasury.gov/ofac/sdn">
              <sdn:sdnEntry>
                <sdn:firstName>Ivan</sdn:firstName>
                <sdn:lastName>Petrov</sdn:lastName>
                <sdn:idList>
                  <sdn:id>
                    <sdn:idType>Digital Currency Address - XBT</sdn:idType>
                    <sdn:idNumber>1A2b3C4d</sdn:idNumber>
                  </sdn:id>
                </sdn:idList>
              </sdn:sdnEntry>
            </sdn:sdnList>"#;

        let triples = extract_addresses(doc).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].entity, "Ivan Petrov");
    }

    #[test]
    fn test_default_namespace_document() {
        let doc = br#"<sdnList xmlns="https://sanctionslist.ofac.treas.gov/xml">
              <sdnEntry>
                <lastName>Acme</lastName>
                <idList>
                  <id>
                    <idType>Digital Currency Address - ETH</idType>
                    <idNumber>0xAbC</idNumber>
                  </id>
                </idList>
              </sdnEntry>
            </sdnList>"#;

        let triples = extract_addresses(doc).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].address, "0xAbC");
    }

    #[test]
    fn test_aka_names_are_not_part_of_entity() {
        let doc = br#"<sdnList>
              <sdnEntry>
                <lastName>Real Name</lastName>
                <akaList>
                  <aka>
                    <firstName>Fake</firstName>
                    <lastName>Alias</lastName>
                  </aka>
                </akaList>
                <idList>
                  <id>
                    <idType>Digital Currency Address - XBT</idType>
                    <idNumber>1abc</idNumber>
                  </id>
                </idList>
              </sdnEntry>
            </sdnList>"#;

        let triples = extract_addresses(doc).unwrap();
        assert_eq!(triples[0].entity, "Real Name");
    }

    #[test]
    fn test_entry_without_id_list() {
        let doc = b"<sdnList><sdnEntry><lastName>Acme</lastName></sdnEntry></sdnList>";
        assert!(extract_addresses(doc).unwrap().is_empty());
    }

    #[test]
    fn test_non_xml_input_is_a_parse_error() {
        let err = extract_addresses(b"definitely not xml").unwrap_err();
        assert!(matches!(err, ScreenerError::Parse(_)));
    }

    #[test]
    fn test_truncated_document_is_a_parse_error() {
        let err = extract_addresses(b"<sdnList><sdnEntry></sdnList>").unwrap_err();
        assert!(matches!(err, ScreenerError::Parse(_)));
    }

    #[test]
    fn test_empty_list_yields_no_triples() {
        assert!(extract_addresses(b"<sdnList/>").unwrap().is_empty());
    }

    #[test]
    fn test_address_whitespace_is_trimmed() {
        let doc = document(&[entry(
            ("Ivan", "Petrov"),
            &[("Digital Currency Address - XBT", "  1abc  ")],
        )]);

        let triples = extract_addresses(&doc).unwrap();
        assert_eq!(triples[0].address, "1abc");
    }
}
