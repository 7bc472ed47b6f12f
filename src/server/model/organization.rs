use std::{fmt, str::FromStr};

use crate::server::model::db::{CollectivityModel, DdfipModel, DgfipModel, PublisherModel};

/// Kind of organization a user belongs to, stored in `users.organization_type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrganizationType {
    Publisher,
    Collectivity,
    Ddfip,
    Dgfip,
}

impl OrganizationType {
    pub const ALL: [OrganizationType; 4] = [
        OrganizationType::Publisher,
        OrganizationType::Collectivity,
        OrganizationType::Ddfip,
        OrganizationType::Dgfip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publisher => "Publisher",
            Self::Collectivity => "Collectivity",
            Self::Ddfip => "DDFIP",
            Self::Dgfip => "DGFIP",
        }
    }
}

impl FromStr for OrganizationType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or(())
    }
}

impl fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of territory a collectivity administers, stored in `collectivities.territory_type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerritoryType {
    Commune,
    Epci,
    Departement,
    Region,
}

impl TerritoryType {
    pub const ALL: [TerritoryType; 4] = [
        TerritoryType::Commune,
        TerritoryType::Epci,
        TerritoryType::Departement,
        TerritoryType::Region,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commune => "Commune",
            Self::Epci => "EPCI",
            Self::Departement => "Departement",
            Self::Region => "Region",
        }
    }
}

impl FromStr for TerritoryType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or(())
    }
}

/// Organization record a user belongs to.
#[derive(Clone, Debug, PartialEq)]
pub enum Organization {
    Publisher(PublisherModel),
    Collectivity(CollectivityModel),
    Ddfip(DdfipModel),
    Dgfip(DgfipModel),
}

impl Organization {
    pub fn id(&self) -> uuid::Uuid {
        match self {
            Self::Publisher(publisher) => publisher.id,
            Self::Collectivity(collectivity) => collectivity.id,
            Self::Ddfip(ddfip) => ddfip.id,
            Self::Dgfip(dgfip) => dgfip.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Publisher(publisher) => &publisher.name,
            Self::Collectivity(collectivity) => &collectivity.name,
            Self::Ddfip(ddfip) => &ddfip.name,
            Self::Dgfip(dgfip) => &dgfip.name,
        }
    }

    pub fn organization_type(&self) -> OrganizationType {
        match self {
            Self::Publisher(_) => OrganizationType::Publisher,
            Self::Collectivity(_) => OrganizationType::Collectivity,
            Self::Ddfip(_) => OrganizationType::Ddfip,
            Self::Dgfip(_) => OrganizationType::Dgfip,
        }
    }

    pub fn is_discarded(&self) -> bool {
        match self {
            Self::Publisher(publisher) => publisher.discarded_at.is_some(),
            Self::Collectivity(collectivity) => collectivity.discarded_at.is_some(),
            Self::Ddfip(ddfip) => ddfip.discarded_at.is_some(),
            Self::Dgfip(dgfip) => dgfip.discarded_at.is_some(),
        }
    }
}
