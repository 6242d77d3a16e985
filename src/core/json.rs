use crate::core::errors::Result;
use serde::{Deserialize, Serialize};

/*-------------------------------------------------------------------------------------------------
  Parse JSON
-------------------------------------------------------------------------------------------------*/

/// Parse `aws ec2 describe-vpcs --output json` output.
pub fn parse_vpcs(json: &str) -> Result<JsonDescribeVpcs> {
    Ok(serde_json::from_str(json)?)
}

/// Parse `aws ec2 describe-subnets --output json` output.
pub fn parse_subnets(json: &str) -> Result<JsonDescribeSubnets> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a saved inventory document (`{"Vpcs": [...], "Subnets": [...]}`).
pub fn parse_inventory(json: &str) -> Result<JsonInventory> {
    Ok(serde_json::from_str(json)?)
}

/*-------------------------------------------------------------------------------------------------
  JSON Data Structures
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Describe Outputs
--------------------------------------------------------------------------------------*/

#[derive(Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonDescribeVpcs {
    #[serde(default)]
    pub vpcs: Vec<JsonVpc>,
}

#[derive(Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonDescribeSubnets {
    #[serde(default)]
    pub subnets: Vec<JsonSubnet>,
}

/// Both describe outputs merged into one document.
#[derive(Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonInventory {
    #[serde(default)]
    pub vpcs: Vec<JsonVpc>,

    #[serde(default)]
    pub subnets: Vec<JsonSubnet>,
}

/*--------------------------------------------------------------------------------------
  VPC
--------------------------------------------------------------------------------------*/

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonVpc {
    pub vpc_id: String,

    #[serde(default)]
    pub cidr_block: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cidr_block_association_set: Vec<JsonCidrBlockAssociation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<JsonTag>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonCidrBlockAssociation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association_id: Option<String>,

    pub cidr_block: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr_block_state: Option<JsonCidrBlockState>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonCidrBlockState {
    pub state: String,
}

/*--------------------------------------------------------------------------------------
  Subnet
--------------------------------------------------------------------------------------*/

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonSubnet {
    pub subnet_id: String,

    #[serde(default)]
    pub vpc_id: String,

    #[serde(default)]
    pub cidr_block: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_ip_address_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<JsonTag>,
}

/*--------------------------------------------------------------------------------------
  Tag
--------------------------------------------------------------------------------------*/

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonTag {
    pub key: String,
    pub value: String,
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
