use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chemical elements commonly encountered in ligand-capped nanocrystals.
///
/// The discriminant of every variant is its atomic number, so core atoms can be
/// selected either by symbol (`"Cd"`) or by atomic number (`48`).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Element {
    // --- Organic ---
    H = 1,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    P = 15,
    S = 16,

    // --- Halides ---
    Cl = 17,
    Br = 35,
    I = 53,

    // --- Alkali & Alkaline Earth ---
    Li = 3,
    Na = 11,
    Mg = 12,
    K = 19,
    Ca = 20,
    Rb = 37,
    Cs = 55,

    // --- Transition & Post-transition Metals ---
    Mn = 25,
    Fe = 26,
    Co = 27,
    Ni = 28,
    Cu = 29,
    Zn = 30,
    Ga = 31,
    Ag = 47,
    Cd = 48,
    In = 49,
    Sn = 50,
    Pt = 78,
    Au = 79,
    Hg = 80,
    Pb = 82,

    // --- Metalloids & Chalcogens ---
    Si = 14,
    Ge = 32,
    As = 33,
    Se = 34,
    Sb = 51,
    Te = 52,

    // Dummy atom or unrecognised symbol
    #[default]
    Unknown = 0,
}

static SYMBOLS: Map<&'static str, Element> = phf_map! {
    "H" => Element::H, "D" => Element::H, "B" => Element::B, "C" => Element::C,
    "N" => Element::N, "O" => Element::O, "F" => Element::F, "P" => Element::P,
    "S" => Element::S, "CL" => Element::Cl, "BR" => Element::Br, "I" => Element::I,
    "LI" => Element::Li, "NA" => Element::Na, "MG" => Element::Mg, "K" => Element::K,
    "CA" => Element::Ca, "RB" => Element::Rb, "CS" => Element::Cs,
    "MN" => Element::Mn, "FE" => Element::Fe, "CO" => Element::Co, "NI" => Element::Ni,
    "CU" => Element::Cu, "ZN" => Element::Zn, "GA" => Element::Ga, "AG" => Element::Ag,
    "CD" => Element::Cd, "IN" => Element::In, "SN" => Element::Sn, "PT" => Element::Pt,
    "AU" => Element::Au, "HG" => Element::Hg, "PB" => Element::Pb,
    "SI" => Element::Si, "GE" => Element::Ge, "AS" => Element::As, "SE" => Element::Se,
    "SB" => Element::Sb, "TE" => Element::Te,
};

const ALL: [Element; 40] = [
    Element::H,
    Element::B,
    Element::C,
    Element::N,
    Element::O,
    Element::F,
    Element::P,
    Element::S,
    Element::Cl,
    Element::Br,
    Element::I,
    Element::Li,
    Element::Na,
    Element::Mg,
    Element::K,
    Element::Ca,
    Element::Rb,
    Element::Cs,
    Element::Mn,
    Element::Fe,
    Element::Co,
    Element::Ni,
    Element::Cu,
    Element::Zn,
    Element::Ga,
    Element::Ag,
    Element::Cd,
    Element::In,
    Element::Sn,
    Element::Pt,
    Element::Au,
    Element::Hg,
    Element::Pb,
    Element::Si,
    Element::Ge,
    Element::As,
    Element::Se,
    Element::Sb,
    Element::Te,
    Element::Unknown,
];

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseElementError {
    #[error("Unrecognised element symbol '{0}'")]
    Symbol(String),
    #[error("Unsupported atomic number {0}")]
    AtomicNumber(u8),
}

impl Element {
    pub fn atomic_number(self) -> u8 {
        self as u8
    }

    pub fn from_atomic_number(number: u8) -> Result<Self, ParseElementError> {
        ALL.iter()
            .copied()
            .find(|element| element.atomic_number() == number && *element != Element::Unknown)
            .ok_or(ParseElementError::AtomicNumber(number))
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::H => "H",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Br => "Br",
            Element::I => "I",
            Element::Li => "Li",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Rb => "Rb",
            Element::Cs => "Cs",
            Element::Mn => "Mn",
            Element::Fe => "Fe",
            Element::Co => "Co",
            Element::Ni => "Ni",
            Element::Cu => "Cu",
            Element::Zn => "Zn",
            Element::Ga => "Ga",
            Element::Ag => "Ag",
            Element::Cd => "Cd",
            Element::In => "In",
            Element::Sn => "Sn",
            Element::Pt => "Pt",
            Element::Au => "Au",
            Element::Hg => "Hg",
            Element::Pb => "Pb",
            Element::Si => "Si",
            Element::Ge => "Ge",
            Element::As => "As",
            Element::Se => "Se",
            Element::Sb => "Sb",
            Element::Te => "Te",
            Element::Unknown => "Xx",
        }
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    /// Parses either an element symbol (case-insensitive) or an atomic number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(number) = trimmed.parse::<u8>() {
            return Self::from_atomic_number(number);
        }
        SYMBOLS
            .get(trimmed.to_ascii_uppercase().as_str())
            .copied()
            .ok_or_else(|| ParseElementError::Symbol(trimmed.to_string()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
