use crate::core::errors::{Error, Result};
use crate::core::json::{
    self, JsonCidrBlockAssociation, JsonCidrBlockState, JsonInventory, JsonSubnet, JsonTag,
    JsonVpc,
};
use log::info;
use std::fs;
use std::path::Path;

/*-------------------------------------------------------------------------------------------------
  Inventory Provider
-------------------------------------------------------------------------------------------------*/

/// Source of VPC and subnet records.
///
/// Implemented by [Client](crate::Client), which queries the AWS CLI, and by
/// [Inventory], an in-memory snapshot. Pass a provider explicitly to whatever
/// needs the records.
pub trait InventoryProvider {
    fn vpcs(&self) -> Result<Vec<Vpc>>;

    fn subnets(&self) -> Result<Vec<Subnet>>;
}

/*-------------------------------------------------------------------------------------------------
  Records
-------------------------------------------------------------------------------------------------*/

/// Resource tag.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// A CIDR block associated with a VPC.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CidrBlockAssociation {
    pub cidr_block: String,

    /// Association state (`associated`, `disassociated`, ...), if reported.
    pub state: Option<String>,
}

impl CidrBlockAssociation {
    pub fn is_associated(&self) -> bool {
        self.state.as_deref().map_or(true, |state| state == "associated")
    }
}

/// A VPC record.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Vpc {
    pub vpc_id: String,

    /// Primary IPv4 CIDR block.
    pub cidr_block: String,

    pub cidr_block_associations: Vec<CidrBlockAssociation>,

    pub tags: Vec<Tag>,
}

impl Vpc {
    /// Value of the `Name` tag, or an empty string.
    pub fn name(&self) -> &str {
        tag_value(&self.tags, "Name").unwrap_or_default()
    }

    /// The primary CIDR block followed by every other associated block, in
    /// association order and without duplicates.
    pub fn cidr_blocks(&self) -> Vec<&str> {
        let mut cidr_blocks = vec![self.cidr_block.as_str()];
        for association in &self.cidr_block_associations {
            let cidr_block = association.cidr_block.as_str();
            if association.is_associated() && !cidr_blocks.contains(&cidr_block) {
                cidr_blocks.push(cidr_block);
            }
        }
        cidr_blocks
    }
}

/// A subnet record.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Subnet {
    pub subnet_id: String,
    pub vpc_id: String,
    pub cidr_block: String,
    pub available_ip_address_count: Option<u64>,
    pub availability_zone: Option<String>,
    pub state: Option<String>,
    pub tags: Vec<Tag>,
}

impl Subnet {
    /// Value of the `Name` tag, or an empty string.
    pub fn name(&self) -> &str {
        tag_value(&self.tags, "Name").unwrap_or_default()
    }
}

/// Value of the tag with `key`, if present.
pub fn tag_value<'t>(tags: &'t [Tag], key: &str) -> Option<&'t str> {
    tags.iter()
        .find(|tag| tag.key == key)
        .map(|tag| tag.value.as_str())
}

/*-------------------------------------------------------------------------------------------------
  Inventory
-------------------------------------------------------------------------------------------------*/

/// Snapshot of VPC and subnet records.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Inventory {
    pub vpcs: Vec<Vpc>,
    pub subnets: Vec<Subnet>,
}

impl Inventory {
    /// Collect all records from `provider`.
    pub fn fetch(provider: &dyn InventoryProvider) -> Result<Self> {
        let vpcs = provider.vpcs()?;
        let subnets = provider.subnets()?;
        info!(
            "Fetched inventory: {} VPC(s), {} subnet(s)",
            vpcs.len(),
            subnets.len()
        );
        Ok(Self { vpcs, subnets })
    }

    /// Parse an inventory document (`{"Vpcs": [...], "Subnets": [...]}`).
    pub fn from_json(json: &str) -> Result<Self> {
        json::parse_inventory(json).map(Inventory::from)
    }

    /// Read an inventory document from `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(Error::from)
            .inspect_err(|error| log::error!("Failed to read inventory `{:?}`: {}", path, error))?;
        let inventory = Self::from_json(&json)?;
        info!("Read inventory from: {:?}", path);
        Ok(inventory)
    }

    /// Serialize the inventory to a pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&JsonInventory::from(self))?)
    }

    /// Write the inventory JSON document to `path`, creating parent
    /// directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_json()?)
            .inspect(|_| info!("Saved inventory to: {:?}", path))
            .map_err(Error::from)
    }
}

impl InventoryProvider for Inventory {
    fn vpcs(&self) -> Result<Vec<Vpc>> {
        Ok(self.vpcs.clone())
    }

    fn subnets(&self) -> Result<Vec<Subnet>> {
        Ok(self.subnets.clone())
    }
}

/*-------------------------------------------------------------------------------------------------
  JSON Conversions
-------------------------------------------------------------------------------------------------*/

impl From<JsonTag> for Tag {
    fn from(value: JsonTag) -> Self {
        Self {
            key: value.key,
            value: value.value,
        }
    }
}

impl From<&Tag> for JsonTag {
    fn from(value: &Tag) -> Self {
        Self {
            key: value.key.clone(),
            value: value.value.clone(),
        }
    }
}

impl From<JsonVpc> for Vpc {
    fn from(value: JsonVpc) -> Self {
        Self {
            vpc_id: value.vpc_id,
            cidr_block: value.cidr_block,
            cidr_block_associations: value
                .cidr_block_association_set
                .into_iter()
                .map(|association| CidrBlockAssociation {
                    cidr_block: association.cidr_block,
                    state: association.cidr_block_state.map(|state| state.state),
                })
                .collect(),
            tags: value.tags.into_iter().map(Tag::from).collect(),
        }
    }
}

impl From<&Vpc> for JsonVpc {
    fn from(value: &Vpc) -> Self {
        Self {
            vpc_id: value.vpc_id.clone(),
            cidr_block: value.cidr_block.clone(),
            cidr_block_association_set: value
                .cidr_block_associations
                .iter()
                .map(|association| JsonCidrBlockAssociation {
                    association_id: None,
                    cidr_block: association.cidr_block.clone(),
                    cidr_block_state: association
                        .state
                        .clone()
                        .map(|state| JsonCidrBlockState { state }),
                })
                .collect(),
            tags: value.tags.iter().map(JsonTag::from).collect(),
        }
    }
}

impl From<JsonSubnet> for Subnet {
    fn from(value: JsonSubnet) -> Self {
        Self {
            subnet_id: value.subnet_id,
            vpc_id: value.vpc_id,
            cidr_block: value.cidr_block,
            available_ip_address_count: value.available_ip_address_count,
            availability_zone: value.availability_zone,
            state: value.state,
            tags: value.tags.into_iter().map(Tag::from).collect(),
        }
    }
}

impl From<&Subnet> for JsonSubnet {
    fn from(value: &Subnet) -> Self {
        Self {
            subnet_id: value.subnet_id.clone(),
            vpc_id: value.vpc_id.clone(),
            cidr_block: value.cidr_block.clone(),
            available_ip_address_count: value.available_ip_address_count,
            availability_zone: value.availability_zone.clone(),
            state: value.state.clone(),
            tags: value.tags.iter().map(JsonTag::from).collect(),
        }
    }
}

impl From<JsonInventory> for Inventory {
    fn from(value: JsonInventory) -> Self {
        Self {
            vpcs: value.vpcs.into_iter().map(Vpc::from).collect(),
            subnets: value.subnets.into_iter().map(Subnet::from).collect(),
        }
    }
}

impl From<&Inventory> for JsonInventory {
    fn from(value: &Inventory) -> Self {
        Self {
            vpcs: value.vpcs.iter().map(JsonVpc::from).collect(),
            subnets: value.subnets.iter().map(JsonSubnet::from).collect(),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
