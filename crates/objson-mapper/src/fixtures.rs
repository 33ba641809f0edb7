//! Registered types shared by the mapper tests.

use std::net::IpAddr;
use std::sync::OnceLock;

use objson_registry::{enum_property, Property, PropertyTable, Registered};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

enum_property!(Gender { Unknown = 0, Male = 1, Female = 2 });

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zip: u32,
}

impl Registered for Address {
    fn registry() -> &'static PropertyTable<Self> {
        static TABLE: OnceLock<PropertyTable<Address>> = OnceLock::new();
        TABLE.get_or_init(|| {
            PropertyTable::new("Address")
                .with(Property::value("street", |a: &Address| a.street.clone(), |a, v| a.street = v))
                .with(Property::value("city", |a: &Address| a.city.clone(), |a, v| a.city = v))
                .with(Property::value("zip", |a: &Address| a.zip, |a, v| a.zip = v))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub kind: String,
    pub value: String,
}

impl Registered for Contact {
    fn registry() -> &'static PropertyTable<Self> {
        static TABLE: OnceLock<PropertyTable<Contact>> = OnceLock::new();
        TABLE.get_or_init(|| {
            PropertyTable::new("Contact")
                .with(Property::value("kind", |c: &Contact| c.kind.clone(), |c, v| c.kind = v))
                .with(Property::value("value", |c: &Contact| c.value.clone(), |c, v| c.value = v))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub object_name: String,
    pub name: String,
    pub age: i32,
    pub height: f64,
    pub gender: Gender,
    pub nicknames: Vec<String>,
    pub avatar: Vec<u8>,
    pub address: Option<Address>,
    pub contacts: Vec<Contact>,
    pub extra: Map<String, Value>,
    pub history: Vec<Value>,
    pub meta: Value,
    pub last_ip: Option<IpAddr>,
    pub scores: Vec<i64>,
    pub serial: u64,
    pub password: String,
}

impl Registered for Person {
    fn registry() -> &'static PropertyTable<Self> {
        static TABLE: OnceLock<PropertyTable<Person>> = OnceLock::new();
        TABLE.get_or_init(|| {
            PropertyTable::new("Person")
                .with(Property::value(
                    "objectName",
                    |p: &Person| p.object_name.clone(),
                    |p, v| p.object_name = v,
                ))
                .with(Property::value("name", |p: &Person| p.name.clone(), |p, v| p.name = v))
                .with(Property::value("age", |p: &Person| p.age, |p, v| p.age = v))
                .with(Property::value("height", |p: &Person| p.height, |p, v| p.height = v))
                .with(Property::value("gender", |p: &Person| p.gender, |p, v| p.gender = v))
                .with(Property::value(
                    "nicknames",
                    |p: &Person| p.nicknames.clone(),
                    |p, v| p.nicknames = v,
                ))
                .with(Property::value("avatar", |p: &Person| p.avatar.clone(), |p, v| p.avatar = v))
                .with(Property::object("address", |p: &Person| p.address.as_ref(), |p, a| {
                    p.address = Some(a)
                }))
                .with(Property::object_list("contacts", |p: &Person| p.contacts.as_slice(), |p, c| {
                    p.contacts = c
                }))
                .with(Property::value("extra", |p: &Person| p.extra.clone(), |p, v| p.extra = v))
                .with(Property::value("history", |p: &Person| p.history.clone(), |p, v| p.history = v))
                .with(Property::value("meta", |p: &Person| p.meta.clone(), |p, v| p.meta = v))
                .with(Property::value("lastIp", |p: &Person| p.last_ip, |p, v| p.last_ip = v))
                .with(Property::value("scores", |p: &Person| p.scores.clone(), |p, v| p.scores = v))
                .with(Property::read_only("serial", |p: &Person| p.serial))
                .with(Property::write_only("password", |p: &mut Person, v| p.password = v))
        })
    }
}

impl Person {
    pub fn sample() -> Self {
        let mut extra = Map::new();
        extra.insert("team".into(), json!("core"));
        extra.insert("level".into(), json!(3));
        Self {
            name: "Ada".into(),
            age: 36,
            height: 1.75,
            gender: Gender::Female,
            nicknames: vec!["countess".into(), "enchantress".into()],
            avatar: vec![0x00, 0xFF, 0x10],
            address: Some(Address {
                street: "Main St".into(),
                city: "Springfield".into(),
                zip: 12345,
            }),
            contacts: vec![
                Contact {
                    kind: "mail".into(),
                    value: "ada@example.org".into(),
                },
                Contact {
                    kind: "phone".into(),
                    value: "555-0100".into(),
                },
            ],
            extra,
            history: vec![json!(1), json!("two"), json!({"three": 3})],
            meta: json!({"tags": ["a", "b"]}),
            last_ip: Some(IpAddr::from([10, 0, 0, 1])),
            scores: vec![7, -2, 40],
            ..Self::default()
        }
    }
}

/// Plain-valued object used by the property tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    pub flag: bool,
    pub count: i64,
    pub ratio: f64,
    pub label: String,
    pub tags: Vec<String>,
    pub blob: Vec<u8>,
}

impl Registered for Sample {
    fn registry() -> &'static PropertyTable<Self> {
        static TABLE: OnceLock<PropertyTable<Sample>> = OnceLock::new();
        TABLE.get_or_init(|| {
            PropertyTable::new("Sample")
                .with(Property::value("flag", |s: &Sample| s.flag, |s, v| s.flag = v))
                .with(Property::value("count", |s: &Sample| s.count, |s, v| s.count = v))
                .with(Property::value("ratio", |s: &Sample| s.ratio, |s, v| s.ratio = v))
                .with(Property::value("label", |s: &Sample| s.label.clone(), |s, v| s.label = v))
                .with(Property::value("tags", |s: &Sample| s.tags.clone(), |s, v| s.tags = v))
                .with(Property::value("blob", |s: &Sample| s.blob.clone(), |s, v| s.blob = v))
        })
    }
}
