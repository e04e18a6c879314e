use super::*;

/// CIS-2 calls an auction makes against the token it sells.
pub trait HostCis2TokenExt<S>: HasHost<S> {
    /// Query the balance `owner` holds of `token`.
    fn cis2_balance_of(
        &self,
        token: &Token,
        owner: Address,
    ) -> Result<ContractTokenAmount, ContractReadError<Self::ReturnValueType>> {
        let params = ContractBalanceOfQueryParams {
            queries: vec![BalanceOfQuery {
                token_id: token.id.clone(),
                address: owner,
            }],
        };

        let mut result = self
            .invoke_contract_read_only(
                &token.contract,
                &params,
                EntrypointName::new_unchecked(BALANCE_OF_ENTRYPOINT),
                Amount::zero(),
            )
            .map_err(ContractReadError::Call)?
            .ok_or(ContractReadError::Compatibility)?;

        let response = ContractBalanceOfQueryResponse::deserial(&mut result)
            .map_err(|_| ContractReadError::Parse)?;

        // One query was sent, so exactly one amount is expected back
        response
            .0
            .first()
            .copied()
            .ok_or(ContractReadError::Compatibility)
    }

    /// Transfer `amount` of `token` from `from` to account `to`.
    fn cis2_transfer(
        &mut self,
        token: &Token,
        from: Address,
        to: AccountAddress,
        amount: ContractTokenAmount,
    ) -> Result<(), CallContractError<Self::ReturnValueType>> {
        let params: TransferParameter = TransferParams(vec![Transfer {
            token_id: token.id.clone(),
            amount,
            from,
            to: Receiver::Account(to),
            data: AdditionalData::empty(),
        }]);

        self.invoke_contract(
            &token.contract,
            &params,
            EntrypointName::new_unchecked(TRANSFER_ENTRYPOINT),
            Amount::zero(),
        )?;

        Ok(())
    }
}

impl<S, H: HasHost<S>> HostCis2TokenExt<S> for H {}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use crate::test::*;
    use test_infrastructure::*;

    const TOKEN_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };

    const AUCTION: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };

    const USER_1: AccountAddress = AccountAddress([1; 32]);

    fn token() -> Token {
        Token {
            contract: TOKEN_CONTRACT,
            id: TokenIdVec(vec![]),
        }
    }

    fn balance_of_entrypoint() -> OwnedEntrypointName {
        OwnedEntrypointName::new_unchecked(BALANCE_OF_ENTRYPOINT.into())
    }

    fn transfer_entrypoint() -> OwnedEntrypointName {
        OwnedEntrypointName::new_unchecked(TRANSFER_ENTRYPOINT.into())
    }

    #[concordium_test]
    fn test_balance_of() {
        let mut host = TestHost::new((), TestStateBuilder::new());

        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            balance_of_entrypoint(),
            parse_and_map_mock::<ContractBalanceOfQueryParams, _, _>(|params| {
                match params.queries.as_slice() {
                    [query] if query.address == Address::Contract(AUCTION) => {
                        Some(BalanceOfQueryResponse(vec![TokenAmountU64(1000)]))
                    }
                    _ => None,
                }
            }),
        );

        let balance = host.cis2_balance_of(&token(), Address::Contract(AUCTION));

        claim_eq!(balance.ok(), Some(TokenAmountU64(1000)));
    }

    #[concordium_test]
    fn test_balance_of_empty_response() {
        let mut host = TestHost::new((), TestStateBuilder::new());

        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            balance_of_entrypoint(),
            parse_and_map_mock::<ContractBalanceOfQueryParams, _, _>(|_| {
                Some(BalanceOfQueryResponse(Vec::<TokenAmountU64>::new()))
            }),
        );

        let result: ContractResult<ContractTokenAmount> = host
            .cis2_balance_of(&token(), Address::Contract(AUCTION))
            .map_err(CustomContractError::from);

        claim_eq!(result, Err(CustomContractError::Incompatible));
    }

    #[concordium_test]
    fn test_balance_of_missing_entrypoint() {
        let mut host = TestHost::new((), TestStateBuilder::new());

        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            balance_of_entrypoint(),
            failing_mock(|| CallContractError::MissingEntrypoint),
        );

        let result: ContractResult<ContractTokenAmount> = host
            .cis2_balance_of(&token(), Address::Contract(AUCTION))
            .map_err(CustomContractError::from);

        claim_eq!(result, Err(CustomContractError::Incompatible));
    }

    #[concordium_test]
    fn test_transfer() {
        let mut host = TestHost::new((), TestStateBuilder::new());

        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            transfer_entrypoint(),
            parse_and_check_mock::<TransferParameter, _>(
                |params| match params.0.as_slice() {
                    [transfer] => {
                        transfer.amount == TokenAmountU64(250)
                            && matches!(&transfer.to, Receiver::Account(to) if *to == USER_1)
                    }
                    _ => false,
                },
                (),
            ),
        );

        let result = host.cis2_transfer(
            &token(),
            Address::Contract(AUCTION),
            USER_1,
            TokenAmountU64(250),
        );

        claim!(result.is_ok(), "Token transfer should succeed");
    }

    #[concordium_test]
    fn test_transfer_rejected() {
        let mut host = TestHost::new((), TestStateBuilder::new());

        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            transfer_entrypoint(),
            failing_mock(|| CallContractError::Trap),
        );

        let result: ContractResult<()> = host
            .cis2_transfer(
                &token(),
                Address::Contract(AUCTION),
                USER_1,
                TokenAmountU64(250),
            )
            .map_err(CustomContractError::from);

        claim_eq!(result, Err(CustomContractError::InvokeContractError));
    }
}
