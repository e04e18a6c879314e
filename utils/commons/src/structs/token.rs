use super::*;

/// A CIS-2 token: the contract it lives in and its ID within that contract.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub struct Token {
    pub contract: ContractAddress,
    pub id: ContractTokenId,
}
