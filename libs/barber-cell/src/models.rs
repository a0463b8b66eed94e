use serde::Serialize;

/// A barber on the shop roster. Serialized with `barber_id` as the id field,
/// matching the key appointments use to reference the barber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Barber {
    #[serde(rename = "barber_id")]
    pub id: i64,
    pub name: &'static str,
    pub color_tag: &'static str,
}

static ROSTER: [Barber; 2] = [
    Barber {
        id: 1,
        name: "Eduardo",
        color_tag: "#FF5733",
    },
    Barber {
        id: 2,
        name: "João",
        color_tag: "#33C4FF",
    },
];

/// The fixed roster, in display order.
pub fn roster() -> &'static [Barber] {
    &ROSTER
}
