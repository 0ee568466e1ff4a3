//! Static list of tracked IBEX 35 constituents.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Symbol, ValidationError};

/// Provider symbol of the benchmark index.
pub const INDEX_SYMBOL: &str = "^IBEX";

/// Sector label attached to each constituent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Sector {
    Consumer,
    Banking,
    Energy,
    Telecom,
    Technology,
    Construction,
    Transport,
    Pharma,
    Insurance,
    Industrial,
    Tourism,
    RealEstate,
    Distribution,
}

impl Sector {
    pub const ALL: [Sector; 13] = [
        Self::Consumer,
        Self::Banking,
        Self::Energy,
        Self::Telecom,
        Self::Technology,
        Self::Construction,
        Self::Transport,
        Self::Pharma,
        Self::Insurance,
        Self::Industrial,
        Self::Tourism,
        Self::RealEstate,
        Self::Distribution,
    ];

    /// Label written to the snapshot document.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Consumer => "Consumo",
            Self::Banking => "Banca",
            Self::Energy => "Energía",
            Self::Telecom => "Telecom",
            Self::Technology => "Tecnología",
            Self::Construction => "Construcción",
            Self::Transport => "Transporte",
            Self::Pharma => "Farmacia",
            Self::Insurance => "Seguros",
            Self::Industrial => "Industrial",
            Self::Tourism => "Turismo",
            Self::RealEstate => "Inmobiliario",
            Self::Distribution => "Distribución",
        }
    }

    pub fn from_label(label: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|sector| sector.label() == label)
            .ok_or_else(|| ValidationError::UnknownSector {
                value: label.to_owned(),
            })
    }
}

impl Display for Sector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for Sector {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_label(&value)
    }
}

impl From<Sector> for &'static str {
    fn from(value: Sector) -> Self {
        value.label()
    }
}

/// One tracked company: display name, provider symbol and sector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyDescriptor {
    pub name: String,
    pub symbol: Symbol,
    pub sector: Sector,
}

impl CompanyDescriptor {
    pub fn new(
        name: impl Into<String>,
        symbol: &str,
        sector: Sector,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: name.into(),
            symbol: Symbol::parse(symbol)?,
            sector,
        })
    }
}

const IBEX_35: [(&str, &str, Sector); 35] = [
    ("Inditex", "ITX.MC", Sector::Consumer),
    ("Banco Santander", "SAN.MC", Sector::Banking),
    ("Iberdrola", "IBE.MC", Sector::Energy),
    ("BBVA", "BBVA.MC", Sector::Banking),
    ("Telefónica", "TEF.MC", Sector::Telecom),
    ("Repsol", "REP.MC", Sector::Energy),
    ("CaixaBank", "CABK.MC", Sector::Banking),
    ("Amadeus", "AMS.MC", Sector::Technology),
    ("Ferrovial", "FER.MC", Sector::Construction),
    ("Naturgy", "NTGY.MC", Sector::Energy),
    ("ACS", "ACS.MC", Sector::Construction),
    ("Endesa", "ELE.MC", Sector::Energy),
    ("Sabadell", "SAB.MC", Sector::Banking),
    ("Cellnex", "CLNX.MC", Sector::Telecom),
    ("IAG", "IAG.MC", Sector::Transport),
    ("Grifols", "GRF.MC", Sector::Pharma),
    ("Acciona", "ANA.MC", Sector::Energy),
    ("Bankinter", "BKT.MC", Sector::Banking),
    ("Aena", "AENA.MC", Sector::Transport),
    ("Red Eléctrica", "REE.MC", Sector::Energy),
    ("Mapfre", "MAP.MC", Sector::Insurance),
    ("Acerinox", "ACX.MC", Sector::Industrial),
    ("Enagás", "ENG.MC", Sector::Energy),
    ("Unicaja", "UNI.MC", Sector::Banking),
    ("Meliá Hotels", "MEL.MC", Sector::Tourism),
    ("Sacyr", "SCYR.MC", Sector::Construction),
    ("Solaria", "SLR.MC", Sector::Energy),
    ("Fluidra", "FDR.MC", Sector::Industrial),
    ("Rovi", "ROVI.MC", Sector::Pharma),
    ("PharmaMar", "PHM.MC", Sector::Pharma),
    ("Indra", "IDR.MC", Sector::Technology),
    ("ArcelorMittal", "MTS.MC", Sector::Industrial),
    ("Merlin Properties", "MRL.MC", Sector::RealEstate),
    ("Colonial", "COL.MC", Sector::RealEstate),
    ("Logista", "LOG.MC", Sector::Distribution),
];

/// The IBEX 35 constituents in fixed processing order.
///
/// # Errors
///
/// Returns the first [`ValidationError`] raised by a table entry.
pub fn ibex35() -> Result<Vec<CompanyDescriptor>, ValidationError> {
    IBEX_35
        .into_iter()
        .map(|(name, symbol, sector)| CompanyDescriptor::new(name, symbol, sector))
        .collect()
}

/// Symbol of the benchmark index.
pub fn index_symbol() -> Result<Symbol, ValidationError> {
    Symbol::parse(INDEX_SYMBOL)
}
