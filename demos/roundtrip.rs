//! Round-trip Example
//!
//! This example converts an XML catalog into JSON, edits the JSON, and writes it back out as XML.
//!
//! It demonstrates the reserved keys used to carry XML-only information through JSON:
//! - `_attributes` for attributes
//! - `_cdata` for CDATA sections
//! - `_comments` for comments
use serde_json::json;
use xmljson::{ConvertConfig, json_to_xml, xml_to_json_with_config};

const DOCUMENT: &str = include_str!("catalog.xml");

fn main() {
    //
    // Guard against hostile input by capping the nesting depth.
    // The catalog is shallow, so a small limit is plenty.
    let config = ConvertConfig::default().with_max_depth(16);

    //
    // If an error occurs, the error message is designed to be human-readable;
    //      | <c
    //      = At 1:7
    //      = Maximum nesting depth of 2 exceeded
    let mut tree = match xml_to_json_with_config(DOCUMENT, &config) {
        Ok(tree) => tree,
        Err(e) => panic!("Error converting XML document:\n{e}"),
    };

    println!("{}", serde_json::to_string_pretty(&tree).unwrap());

    //
    // Repeated <book> elements became an array, so we can push another one.
    if let Some(books) = tree["catalog"]["book"].as_array_mut() {
        books.push(json!({
            "_attributes": { "id": "bk104", "category": "poetry" },
            "title": "Salt & Stone",
            "author": "R. Iyer",
            "price": 9.75
        }));
    }

    //
    // Comments are only written for elements without attributes, so the catalog's comment is lost here.
    let xml = match json_to_xml(&tree) {
        Ok(xml) => xml,
        Err(e) => panic!("Error converting JSON tree:\n{e}"),
    };
    println!("{xml}");
}
