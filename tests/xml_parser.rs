use xmlplist::{Dictionary, Object, Parser};

fn parse(xml: &str) -> Option<Object> {
    let mut parser = Parser::new(|_| {});
    parser.parse_reader(xml.as_bytes())
}

fn parse_capturing_error(xml: &str) -> (Option<Object>, Vec<String>) {
    let errors = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink_errors = errors.clone();
    let mut parser = Parser::new(move |msg: &str| sink_errors.borrow_mut().push(msg.to_owned()));
    let root = parser.parse_reader(xml.as_bytes());
    let errors = errors.borrow().clone();
    (root, errors)
}

#[test]
fn dictionary_with_one_integer_entry() {
    let root = parse("<plist><dict><key>n</key><integer>42</integer></dict></plist>").unwrap();
    let mut expected = Dictionary::new();
    expected.insert("n".to_owned(), Object::Integer(42));
    assert_eq!(root, Object::Dictionary(expected));
}

#[test]
fn array_of_true_false_null() {
    let root = parse("<plist><array><true/><false/><null/></array></plist>").unwrap();
    assert_eq!(
        root,
        Object::Array(vec![Object::Boolean(true), Object::Boolean(false), Object::Null])
    );
}

#[test]
fn nested_array_inside_dictionary_value() {
    let root = parse(
        "<plist><dict><key>xs</key><array><string>a</string><string>b</string></array></dict></plist>",
    )
    .unwrap();
    let dict = root.as_dictionary().unwrap();
    assert_eq!(
        dict.get("xs").unwrap().as_array().unwrap(),
        &vec![Object::String("a".to_owned()), Object::String("b".to_owned())]
    );
}

#[test]
fn integer_leaf_tolerates_surrounding_whitespace() {
    let root = parse("<plist><integer>  7 </integer></plist>").unwrap();
    assert_eq!(root, Object::Integer(7));
}

#[test]
fn dictionary_requires_key_before_value() {
    let (root, errors) = parse_capturing_error("<plist><dict><integer>1</integer></dict></plist>");
    assert!(root.is_none());
    assert!(errors.iter().any(|e| e.contains("expected key, got 'integer'")));
}

#[test]
fn data_element_decodes_base64() {
    let root = parse("<plist><data>SGVsbG8=</data></plist>").unwrap();
    assert_eq!(root, Object::Data(b"Hello".to_vec()));
}

#[test]
fn data_element_ignores_interior_whitespace() {
    let root = parse("<plist><data>\n  SGVs\n  bG8=\n  </data></plist>").unwrap();
    assert_eq!(root, Object::Data(b"Hello".to_vec()));
}

#[test]
fn whitespace_between_structural_elements_is_insignificant() {
    let tight = parse("<plist><array><integer>1</integer><integer>2</integer></array></plist>").unwrap();
    let spaced = parse(
        "<plist>\n  <array>\n    <integer>1</integer>\n    <integer>2</integer>\n  </array>\n</plist>",
    )
    .unwrap();
    assert_eq!(tight, spaced);
}

#[test]
fn last_writer_wins_on_repeated_dictionary_key() {
    let root = parse(
        "<plist><dict><key>k</key><integer>1</integer><key>k</key><integer>2</integer></dict></plist>",
    )
    .unwrap();
    let dict = root.as_dictionary().unwrap();
    assert_eq!(dict.get("k"), Some(&Object::Integer(2)));
    assert_eq!(dict.len(), 1);
}

#[test]
fn second_top_level_element_is_rejected() {
    let (root, errors) = parse_capturing_error("<plist><string>a</string><string>b</string></plist>");
    assert!(root.is_none());
    assert!(errors.iter().any(|e| e.contains("after root element")));
}

#[test]
fn missing_plist_root_is_rejected() {
    let (root, _errors) = parse_capturing_error("<array><integer>1</integer></array>");
    assert!(root.is_none());
}

#[test]
fn real_value_lands_in_the_real_slot_not_integer() {
    let root = parse("<plist><real>1.5</real></plist>").unwrap();
    assert_eq!(root, Object::Real(1.5));
    assert!(root.as_integer().is_none());
}

#[test]
fn malformed_date_is_a_parse_error() {
    let (root, _errors) = parse_capturing_error("<plist><date>not-a-date</date></plist>");
    assert!(root.is_none());
}

#[test]
fn well_formed_date_round_trips_through_the_object_model() {
    let root = parse("<plist><date>1981-05-16T11:32:06Z</date></plist>").unwrap();
    let date = root.as_date().unwrap();
    assert_eq!(date.to_xml_format(), "1981-05-16T11:32:06Z");
}

#[test]
fn parser_is_single_shot() {
    let mut parser = Parser::new(|_| {});
    let first = parser.parse_reader("<plist><integer>1</integer></plist>".as_bytes());
    assert_eq!(first, Some(Object::Integer(1)));

    let second = parser.parse_reader("<plist><integer>2</integer></plist>".as_bytes());
    assert_eq!(second, None, "re-used parser must not parse again");
}

#[test]
fn unterminated_key_at_dictionary_close_is_an_error() {
    let (root, _errors) = parse_capturing_error("<plist><dict><key>k</key></dict></plist>");
    assert!(root.is_none());
}

#[test]
fn unknown_element_name_is_rejected() {
    let (root, errors) = parse_capturing_error("<plist><frobnicate/></plist>");
    assert!(root.is_none());
    assert!(errors.iter().any(|e| e.contains("unknown element")));
}

#[test]
fn nonwhitespace_text_between_elements_is_rejected() {
    let (root, errors) = parse_capturing_error("<plist><array>stray text<integer>1</integer></array></plist>");
    assert!(root.is_none());
    assert!(errors.iter().any(|e| e.contains("unexpected character data")));
}

#[test]
fn deeply_nested_containers_parse_correctly() {
    let root = parse(
        "<plist><array><array><array><integer>9</integer></array></array></array></plist>",
    )
    .unwrap();
    let outer = root.as_array().unwrap();
    let mid = outer[0].as_array().unwrap();
    let inner = mid[0].as_array().unwrap();
    assert_eq!(inner[0], Object::Integer(9));
}
