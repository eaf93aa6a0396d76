use proptest::prelude::*;
use serde_json::{Value, json};
use xmljson::{
    escape::{escape, unescape},
    json_to_xml, xml_to_json,
};

fn decode_encode_decode(xml: &str) -> (Value, Value) {
    let decoded = xml_to_json(xml).unwrap();
    let encoded = json_to_xml(&decoded).unwrap();
    let redecoded = xml_to_json(&encoded).unwrap();
    (decoded, redecoded)
}

#[test]
fn repeated_elements_roundtrip() {
    let tree = json!({ "items": { "item": ["Apple", "Orange", "Banana"] } });
    let xml = json_to_xml(&tree).unwrap();
    assert_eq!(xml_to_json(&xml).unwrap(), tree);
}

#[test]
fn attributes_roundtrip() {
    let tree = json!({
        "person": { "_attributes": { "id": "1", "gender": "male" }, "name": "John" }
    });
    let xml = json_to_xml(&tree).unwrap();
    assert_eq!(xml_to_json(&xml).unwrap(), tree);
}

#[test]
fn decoded_tree_is_stable() {
    let documents = [
        "<root><name>John Doe</name><age>30</age></root>",
        "<catalog>\n  <book><title>A &amp; B</title><year>2001</year></book>\n  <book><title>&lt;C&gt;</title></book>\n</catalog>",
        "<config><option1/><option2></option2><nested><deeper><leaf>x</leaf></deeper></nested></config>",
        "<ns:root xmlns:ns=\"urn:x\"><ns:a>1</ns:a><ns:a>2</ns:a><ns:a>3</ns:a></ns:root>",
    ];

    for xml in documents {
        let (decoded, redecoded) = decode_encode_decode(xml);
        assert_eq!(decoded, redecoded, "unstable tree for {xml}");
    }
}

proptest! {
    #[test]
    fn escape_removes_reserved_characters(s in ".*") {
        let escaped = escape(&s);
        prop_assert!(!escaped.contains(['<', '>', '"', '\'']));

        let unescaped = unescape(&escaped).unwrap();
        prop_assert_eq!(unescaped.as_ref(), s.as_str());
    }

    #[test]
    fn escape_is_identity_on_clean_text(s in "[^&<>\"']*") {
        let escaped = escape(&s);
        prop_assert_eq!(escaped.as_ref(), s.as_str());
    }

    #[test]
    fn leaf_text_roundtrips(s in "[a-zA-Z0-9 &<>\"']{0,24}[a-zA-Z0-9&<>\"']") {
        let tree = json!({ "root": { "value": s.clone() } });
        let xml = json_to_xml(&tree).unwrap();
        let decoded = xml_to_json(&xml).unwrap();
        prop_assert_eq!(decoded, json!({ "root": { "value": s.trim() } }));
    }

    #[test]
    fn sequences_roundtrip(items in prop::collection::vec("[a-z]{1,8}", 2..6)) {
        let tree = json!({ "list": { "item": items } });
        let xml = json_to_xml(&tree).unwrap();
        prop_assert_eq!(xml_to_json(&xml).unwrap(), tree);
    }
}
