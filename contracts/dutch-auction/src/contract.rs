use super::*;

/// Initialize an unlaunched auction for the given token. The account that
/// deploys the contract becomes the seller.
#[init(contract = "DutchAuction", parameter = "InitParams")]
fn init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    _state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params: InitParams = ctx.parameter_cursor().get()?;

    Ok(State::new(ctx.init_origin(), params.token))
}

/// Launch the auction. The token balance held by the contract at this point
/// becomes the lot.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Sender is not the seller.
/// - Auction was already launched.
/// - Start is not in the future, end is not after start, start price is zero
///   or reservation price is not below start price.
/// - Contract holds no tokens.
/// - Fails to log `Launch` event.
#[receive(
    contract = "DutchAuction",
    name = "launchAuction",
    parameter = "LaunchParams",
    mutable,
    enable_logger
)]
fn launch_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: LaunchParams = ctx.parameter_cursor().get()?;
    host.state().ensure_launchable(&ctx.sender(), &params, ctx.metadata().slot_time())?;

    let token = host.state().token.clone();
    let token_count = host.cis2_balance_of(&token, Address::Contract(ctx.self_address()))?;

    host.state_mut().launch(params, token_count)?;

    let state = host.state();
    let terms = state
        .terms()
        .ok_or(CustomContractError::AuctionNotLaunched)?;
    logger.log(&AuctionEvent::launch(&state.seller, &state.token, terms))?;

    Ok(())
}

/// Current price of the whole lot.
///
/// It rejects if the bidding window is not open.
#[receive(
    contract = "DutchAuction",
    name = "getCurrentPrice",
    return_value = "Amount"
)]
fn get_current_price<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Amount> {
    host.state().current_price(ctx.metadata().slot_time())
}

/// Buy the whole lot at the current price. Overpayment is returned to the
/// buyer. Returns the price paid to the seller.
///
/// It rejects if:
/// - Sender is not an account.
/// - The bidding window is not open or the lot was already sold.
/// - Sender is the seller.
/// - Attached amount is below the current price.
/// - Token or CCD transfers fail.
/// - Fails to log `Buy` event.
#[receive(
    contract = "DutchAuction",
    name = "buy",
    return_value = "Amount",
    mutable,
    payable,
    enable_logger
)]
fn buy<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<Amount> {
    let buyer = match ctx.sender() {
        Address::Account(account) => account,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress),
    };

    // Lot is marked sold before any outbound call
    let settlement = host
        .state_mut()
        .settle(buyer, amount, ctx.metadata().slot_time())?;

    logger.log(&AuctionEvent::buy(&buyer, &settlement))?;

    let token = host.state().token.clone();
    let seller = host.state().seller;

    host.cis2_transfer(
        &token,
        Address::Contract(ctx.self_address()),
        buyer,
        settlement.token_count,
    )?;
    host.invoke_transfer(&seller, settlement.price)?;
    if settlement.refund > Amount::zero() {
        host.invoke_transfer(&buyer, settlement.refund)?;
    }

    Ok(settlement.price)
}

/// Whether the lot was sold or the bidding window has closed.
#[receive(
    contract = "DutchAuction",
    name = "hasAuctionFinished",
    return_value = "bool"
)]
fn has_auction_finished<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<bool> {
    Ok(host.state().phase(ctx.metadata().slot_time()).is_finished())
}

/// Whether the bidding window has closed without a buyer.
#[receive(
    contract = "DutchAuction",
    name = "isAuctionDeserted",
    return_value = "bool"
)]
fn is_auction_deserted<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<bool> {
    Ok(host.state().phase(ctx.metadata().slot_time()).is_deserted())
}

/// Return every token the contract holds to the seller. Allowed before the
/// auction is launched and after it is deserted.
///
/// It rejects if:
/// - Sender is not the seller.
/// - Auction is launched and not finished, or the lot was sold.
/// - Token balance query or transfer fails.
/// - Fails to log `RetrieveTokens` event.
#[receive(
    contract = "DutchAuction",
    name = "retrieveTokens",
    mutable,
    enable_logger
)]
fn retrieve_tokens<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let state = host.state();
    state.ensure_tokens_retrievable(&ctx.sender(), ctx.metadata().slot_time())?;
    let token = state.token.clone();
    let seller = state.seller;

    let self_address = Address::Contract(ctx.self_address());
    let balance = host.cis2_balance_of(&token, self_address)?;
    if balance.0 > 0 {
        host.cis2_transfer(&token, self_address, seller, balance)?;
    }

    logger.log(&AuctionEvent::retrieve_tokens(&seller, balance))?;

    Ok(())
}

/// Send all CCD held by the contract to the seller. CCD only enters through
/// `buy`, which pays everything out again, so this only recovers stray funds.
///
/// It rejects if:
/// - Sender is not the seller.
/// - Fails to log `RetrieveFunds` event.
#[receive(
    contract = "DutchAuction",
    name = "retrieveFunds",
    mutable,
    enable_logger
)]
fn retrieve_funds<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    host.state().ensure_seller(&ctx.sender())?;
    let seller = host.state().seller;

    let balance = host.self_balance();
    if balance > Amount::zero() {
        host.invoke_transfer(&seller, balance)?;
    }

    logger.log(&AuctionEvent::retrieve_funds(&seller, balance))?;

    Ok(())
}

/// CIS-2 receive hook, called by the token contract when tokens are
/// transferred to the auction.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Tokens are not the auctioned token.
/// - Auction was already launched.
/// - Fails to log `Deposit` event.
#[receive(
    contract = "DutchAuction",
    name = "onReceivingCIS2",
    parameter = "ContractOnReceivingParams",
    enable_logger
)]
fn on_receiving_cis2<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: ContractOnReceivingParams = ctx.parameter_cursor().get()?;
    host.state().ensure_deposit(&ctx.sender(), &params.token_id)?;

    logger.log(&AuctionEvent::deposit(&params.from, params.amount))?;

    Ok(())
}

/// View function that returns the auction details.
#[receive(contract = "DutchAuction", name = "view", return_value = "AuctionView")]
fn view<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<AuctionView> {
    let state = host.state();

    Ok(AuctionView {
        seller: state.seller,
        token: state.token.clone(),
        phase: state.phase(ctx.metadata().slot_time()),
        terms: state.terms().cloned(),
        sale: state.sale().cloned(),
    })
}

/// View function that returns the auctioned token balance of the contract.
#[receive(
    contract = "DutchAuction",
    name = "getTokenBalance",
    return_value = "ContractTokenAmount"
)]
fn get_token_balance<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<ContractTokenAmount> {
    let token = &host.state().token;

    Ok(host.cis2_balance_of(token, Address::Contract(ctx.self_address()))?)
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use commons::test::*;
    use concordium_cis2::{
        AdditionalData, BalanceOfQueryResponse, Receiver, TokenAmountU64, TokenIdVec,
    };
    use test_infrastructure::*;

    const SELLER: AccountAddress = AccountAddress([0; 32]);
    const BUYER: AccountAddress = AccountAddress([1; 32]);
    const OTHER: AccountAddress = AccountAddress([2; 32]);

    const TOKEN_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const AUCTION: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };
    const OTHER_CONTRACT: ContractAddress = ContractAddress {
        index: 3,
        subindex: 0,
    };

    const TOKEN_COUNT: u64 = 1000;

    /// Deployment time, in seconds.
    const NOW: u64 = 10_000;
    const START: u64 = NOW + 1000;
    const END: u64 = START + 1000;

    fn timestamp(seconds: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(seconds * 1000)
    }

    fn token() -> Token {
        Token {
            contract: TOKEN_CONTRACT,
            id: TokenIdVec(vec![]),
        }
    }

    fn start_price() -> Amount {
        Amount::from_ccd(10)
    }

    fn reservation_price() -> Amount {
        Amount::from_ccd(1)
    }

    fn launch_params() -> LaunchParams {
        LaunchParams {
            start: timestamp(START),
            end: timestamp(END),
            start_price: start_price(),
            reservation_price: reservation_price(),
        }
    }

    fn receive_ctx(sender: Address, slot_time: Timestamp, parameter: &[u8]) -> TestReceiveContext {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(sender)
            .set_self_address(AUCTION)
            .set_metadata_slot_time(slot_time)
            .set_parameter(parameter);
        ctx
    }

    fn account_ctx(account: AccountAddress, seconds: u64) -> TestReceiveContext<'static> {
        receive_ctx(Address::Account(account), timestamp(seconds), &[])
    }

    fn default_host() -> TestHost<State<TestStateApi>> {
        let mut ctx = TestInitContext::empty();
        let bytes = to_bytes(&InitParams { token: token() });
        ctx.set_init_origin(SELLER).set_parameter(&bytes);
        let mut state_builder = TestStateBuilder::new();

        let state = init(&ctx, &mut state_builder).expect_report("Failed during init_DutchAuction");

        TestHost::new(state, state_builder)
    }

    fn mock_balance(host: &mut TestHost<State<TestStateApi>>, balance: u64) {
        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked(BALANCE_OF_ENTRYPOINT.into()),
            parse_and_map_mock::<ContractBalanceOfQueryParams, _, _>(move |params| {
                match params.queries.as_slice() {
                    [query] if query.address == Address::Contract(AUCTION) => {
                        Some(BalanceOfQueryResponse(vec![TokenAmountU64(balance)]))
                    }
                    _ => None,
                }
            }),
        );
    }

    fn mock_balance_failing(
        host: &mut TestHost<State<TestStateApi>>,
        make_error: fn() -> CallContractError<Option<()>>,
    ) {
        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked(BALANCE_OF_ENTRYPOINT.into()),
            failing_mock(make_error),
        );
    }

    /// Token contract accepting a single transfer of `amount` from the auction to `to`.
    fn mock_transfer(host: &mut TestHost<State<TestStateApi>>, to: AccountAddress, amount: u64) {
        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked(TRANSFER_ENTRYPOINT.into()),
            parse_and_check_mock::<TransferParameter, _>(
                move |params| match params.0.as_slice() {
                    [transfer] => {
                        transfer.from == Address::Contract(AUCTION)
                            && transfer.amount == TokenAmountU64(amount)
                            && matches!(&transfer.to, Receiver::Account(account) if *account == to)
                    }
                    _ => false,
                },
                (),
            ),
        );
    }

    fn mock_transfer_rejected(host: &mut TestHost<State<TestStateApi>>) {
        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked(TRANSFER_ENTRYPOINT.into()),
            failing_mock(|| CallContractError::Trap),
        );
    }

    fn launch_with(
        host: &mut TestHost<State<TestStateApi>>,
        params: &LaunchParams,
    ) -> ContractResult<()> {
        let bytes = to_bytes(params);
        let ctx = receive_ctx(Address::Account(SELLER), timestamp(NOW), &bytes);
        let mut logger = TestLogger::init();
        launch_auction(&ctx, host, &mut logger)
    }

    fn launched_host() -> TestHost<State<TestStateApi>> {
        let mut host = default_host();
        mock_balance(&mut host, TOKEN_COUNT);
        claim_eq!(launch_with(&mut host, &launch_params()), Ok(()));
        host
    }

    fn buy_at(
        host: &mut TestHost<State<TestStateApi>>,
        buyer: AccountAddress,
        seconds: u64,
        amount: Amount,
    ) -> ContractResult<Amount> {
        let ctx = account_ctx(buyer, seconds);
        let mut logger = TestLogger::init();
        host.set_self_balance(amount);
        buy(&ctx, host, amount, &mut logger)
    }

    fn price_at(host: &TestHost<State<TestStateApi>>, seconds: u64) -> ContractResult<Amount> {
        get_current_price(&account_ctx(OTHER, seconds), host)
    }

    fn finished_and_deserted(host: &TestHost<State<TestStateApi>>, seconds: u64) -> (bool, bool) {
        let ctx = account_ctx(OTHER, seconds);
        (
            has_auction_finished(&ctx, host).expect_report("hasAuctionFinished failed"),
            is_auction_deserted(&ctx, host).expect_report("isAuctionDeserted failed"),
        )
    }

    fn retrieve_tokens_as(
        host: &mut TestHost<State<TestStateApi>>,
        sender: AccountAddress,
        seconds: u64,
    ) -> ContractResult<()> {
        let ctx = account_ctx(sender, seconds);
        let mut logger = TestLogger::init();
        retrieve_tokens(&ctx, host, &mut logger)
    }

    #[concordium_test]
    fn test_init() {
        let host = default_host();
        let state = host.state();

        claim_eq!(state.seller, SELLER);
        claim_eq!(state.token, token());
        claim_eq!(state.stage, AuctionStage::Unlaunched);
        claim_eq!(finished_and_deserted(&host, NOW), (false, false));
    }

    #[concordium_test]
    fn test_launch() {
        let mut host = default_host();
        mock_balance(&mut host, TOKEN_COUNT);

        let bytes = to_bytes(&launch_params());
        let ctx = receive_ctx(Address::Account(SELLER), timestamp(NOW), &bytes);
        let mut logger = TestLogger::init();
        let result = launch_auction(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(()));
        claim_eq!(
            host.state().terms(),
            Some(&AuctionTerms {
                start: timestamp(START),
                end: timestamp(END),
                start_price: start_price(),
                reservation_price: reservation_price(),
                token_count: TokenAmountU64(TOKEN_COUNT),
            })
        );
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(logger.logs[0][0], LAUNCH_TAG);
    }

    #[concordium_test]
    fn test_launch_timestamps() {
        let mut host = default_host();
        mock_balance(&mut host, TOKEN_COUNT);

        let cases = vec![
            (NOW, END, CustomContractError::InvalidStartTime),
            (NOW - 1, END, CustomContractError::InvalidStartTime),
            (START, START, CustomContractError::InvalidEndTime),
            (START, START - 1, CustomContractError::InvalidEndTime),
        ];
        for (start, end, error) in cases {
            let params = LaunchParams {
                start: timestamp(start),
                end: timestamp(end),
                ..launch_params()
            };
            claim_eq!(launch_with(&mut host, &params), Err(error));
        }

        claim_eq!(host.state().stage, AuctionStage::Unlaunched);
    }

    #[concordium_test]
    fn test_launch_prices() {
        let mut host = default_host();
        mock_balance(&mut host, TOKEN_COUNT);

        let params = LaunchParams {
            start_price: Amount::zero(),
            reservation_price: Amount::zero(),
            ..launch_params()
        };
        claim_eq!(
            launch_with(&mut host, &params),
            Err(CustomContractError::ZeroStartPrice)
        );

        let params = LaunchParams {
            reservation_price: start_price(),
            ..launch_params()
        };
        claim_eq!(
            launch_with(&mut host, &params),
            Err(CustomContractError::InvalidReservationPrice)
        );

        let params = LaunchParams {
            reservation_price: Amount::zero(),
            ..launch_params()
        };
        claim_eq!(launch_with(&mut host, &params), Ok(()));
        claim_eq!(
            host.state().terms().map(|terms| terms.reservation_price),
            Some(Amount::zero())
        );
    }

    #[concordium_test]
    fn test_launch_unauthorized() {
        let mut host = default_host();
        mock_balance(&mut host, TOKEN_COUNT);

        let bytes = to_bytes(&launch_params());
        let ctx = receive_ctx(Address::Account(OTHER), timestamp(NOW), &bytes);
        let mut logger = TestLogger::init();

        claim_eq!(
            launch_auction(&ctx, &mut host, &mut logger),
            Err(CustomContractError::Unauthorized)
        );
        claim_eq!(host.state().stage, AuctionStage::Unlaunched);
    }

    #[concordium_test]
    fn test_launch_empty_lot() {
        let mut host = default_host();
        mock_balance(&mut host, 0);

        claim_eq!(
            launch_with(&mut host, &launch_params()),
            Err(CustomContractError::EmptyLot)
        );
        claim_eq!(host.state().stage, AuctionStage::Unlaunched);

        // Tokens sent later can still be recovered, since the auction never launched
        mock_balance(&mut host, TOKEN_COUNT);
        mock_transfer(&mut host, SELLER, TOKEN_COUNT);
        claim_eq!(retrieve_tokens_as(&mut host, SELLER, NOW), Ok(()));
    }

    #[concordium_test]
    fn test_launch_balance_query_failure() {
        let mut host = default_host();

        mock_balance_failing(&mut host, || CallContractError::Trap);
        claim_eq!(
            launch_with(&mut host, &launch_params()),
            Err(CustomContractError::InvokeContractError)
        );
        claim_eq!(host.state().stage, AuctionStage::Unlaunched);

        // Token contract without a CIS-2 `balanceOf`
        mock_balance_failing(&mut host, || CallContractError::MissingEntrypoint);
        claim_eq!(
            launch_with(&mut host, &launch_params()),
            Err(CustomContractError::Incompatible)
        );
        claim_eq!(host.state().stage, AuctionStage::Unlaunched);

        // Launch still works once the token contract answers
        mock_balance(&mut host, TOKEN_COUNT);
        claim_eq!(launch_with(&mut host, &launch_params()), Ok(()));
    }

    #[concordium_test]
    fn test_relaunch() {
        let mut host = launched_host();

        // Different but valid terms
        let params = LaunchParams {
            start: timestamp(START + 10),
            end: timestamp(END + 10),
            ..launch_params()
        };
        claim_eq!(
            launch_with(&mut host, &params),
            Err(CustomContractError::AlreadyLaunched)
        );

        // Completed auctions can not be relaunched either
        let bytes = to_bytes(&LaunchParams {
            start: timestamp(END + 100),
            end: timestamp(END + 200),
            ..launch_params()
        });
        let ctx = receive_ctx(Address::Account(SELLER), timestamp(END + 1), &bytes);
        let mut logger = TestLogger::init();
        claim_eq!(
            launch_auction(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AlreadyLaunched)
        );

        claim_eq!(
            host.state().terms().map(|terms| terms.start),
            Some(timestamp(START))
        );
    }

    #[concordium_test]
    fn test_current_price_window() {
        let host = default_host();
        claim_eq!(
            price_at(&host, START),
            Err(CustomContractError::AuctionNotLaunched)
        );

        let host = launched_host();
        claim_eq!(
            price_at(&host, START - 1),
            Err(CustomContractError::AuctionNotStarted)
        );
        claim_eq!(price_at(&host, START), Ok(start_price()));
        // 10 CCD - floor(9 CCD * 250 / 1000)
        claim_eq!(
            price_at(&host, START + 250),
            Ok(Amount::from_micro_ccd(7_750_000))
        );
        claim_eq!(price_at(&host, END), Err(CustomContractError::AuctionFinished));
        claim_eq!(
            price_at(&host, END + 3600),
            Err(CustomContractError::AuctionFinished)
        );
    }

    #[concordium_test]
    fn test_current_price_half_window() {
        let mut host = default_host();
        mock_balance(&mut host, TOKEN_COUNT);
        let params = LaunchParams {
            start_price: Amount::from_micro_ccd(10),
            reservation_price: Amount::from_micro_ccd(1),
            ..launch_params()
        };
        claim_eq!(launch_with(&mut host, &params), Ok(()));

        // 10 - floor(9 * 500 / 1000)
        claim_eq!(price_at(&host, START + 500), Ok(Amount::from_micro_ccd(6)));
    }

    #[concordium_test]
    fn test_buy_exact_price() {
        let mut host = launched_host();
        mock_transfer(&mut host, BUYER, TOKEN_COUNT);
        let price = price_at(&host, START + 500).expect_report("Price should be defined");

        let ctx = account_ctx(BUYER, START + 500);
        let mut logger = TestLogger::init();
        host.set_self_balance(price);
        let result = buy(&ctx, &mut host, price, &mut logger);

        claim_eq!(result, Ok(price));
        claim!(host.transfer_occurred(&SELLER, price));
        claim_eq!(host.self_balance(), Amount::zero());
        claim_eq!(
            host.state().sale(),
            Some(&Sale {
                buyer: BUYER,
                price,
            })
        );
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(logger.logs[0][0], BUY_TAG);
    }

    #[concordium_test]
    fn test_buy_refunds_overpayment() {
        let mut host = launched_host();
        mock_transfer(&mut host, BUYER, TOKEN_COUNT);

        let price = Amount::from_micro_ccd(5_500_000);
        let result = buy_at(&mut host, BUYER, START + 500, start_price());

        claim_eq!(result, Ok(price));
        claim!(host.transfer_occurred(&SELLER, price));
        claim!(host.transfer_occurred(&BUYER, Amount::from_micro_ccd(4_500_000)));
        claim_eq!(host.self_balance(), Amount::zero());
    }

    #[concordium_test]
    fn test_buy_insufficient_payment() {
        let mut host = launched_host();
        mock_transfer(&mut host, BUYER, TOKEN_COUNT);

        let price = price_at(&host, START + 500).expect_report("Price should be defined");
        let result = buy_at(
            &mut host,
            BUYER,
            START + 500,
            Amount::from_micro_ccd(price.micro_ccd - 1),
        );

        claim_eq!(result, Err(CustomContractError::InsufficientPayment));
        claim_eq!(finished_and_deserted(&host, START + 500), (false, false));
    }

    #[concordium_test]
    fn test_buy_reservation_price_near_end() {
        let mut host = launched_host();
        mock_transfer(&mut host, BUYER, TOKEN_COUNT);

        // One millisecond before the end the price is still above reservation
        let ctx = receive_ctx(
            Address::Account(BUYER),
            Timestamp::from_timestamp_millis(END * 1000 - 1),
            &[],
        );
        let mut logger = TestLogger::init();
        host.set_self_balance(reservation_price());
        claim_eq!(
            buy(&ctx, &mut host, reservation_price(), &mut logger),
            Err(CustomContractError::InsufficientPayment)
        );

        // 10 CCD - floor(9 CCD * 999_999 / 1_000_000)
        let price = Amount::from_micro_ccd(1_000_009);
        host.set_self_balance(price);
        claim_eq!(buy(&ctx, &mut host, price, &mut logger), Ok(price));
        claim!(host.transfer_occurred(&SELLER, price));
    }

    #[concordium_test]
    fn test_buy_by_seller() {
        let mut host = launched_host();
        mock_transfer(&mut host, SELLER, TOKEN_COUNT);

        claim_eq!(
            buy_at(&mut host, SELLER, START, start_price()),
            Err(CustomContractError::OwnerForbidden)
        );
    }

    #[concordium_test]
    fn test_buy_by_contract() {
        let mut host = launched_host();

        let ctx = receive_ctx(Address::Contract(OTHER_CONTRACT), timestamp(START), &[]);
        let mut logger = TestLogger::init();
        host.set_self_balance(start_price());

        claim_eq!(
            buy(&ctx, &mut host, start_price(), &mut logger),
            Err(CustomContractError::OnlyAccountAddress)
        );
    }

    #[concordium_test]
    fn test_buy_outside_window() {
        let mut host = default_host();
        claim_eq!(
            buy_at(&mut host, BUYER, START, start_price()),
            Err(CustomContractError::AuctionNotLaunched)
        );

        let mut host = launched_host();
        mock_transfer(&mut host, BUYER, TOKEN_COUNT);
        claim_eq!(
            buy_at(&mut host, BUYER, START - 1, start_price()),
            Err(CustomContractError::AuctionNotStarted)
        );
        claim_eq!(
            buy_at(&mut host, BUYER, END, start_price()),
            Err(CustomContractError::AuctionFinished)
        );
    }

    #[concordium_test]
    fn test_buy_only_once() {
        let mut host = launched_host();
        mock_transfer(&mut host, BUYER, TOKEN_COUNT);

        claim!(buy_at(&mut host, BUYER, START + 10, start_price()).is_ok());
        claim_eq!(finished_and_deserted(&host, START + 10), (true, false));
        claim_eq!(
            price_at(&host, START + 20),
            Err(CustomContractError::AuctionFinished)
        );

        mock_transfer(&mut host, OTHER, TOKEN_COUNT);
        claim_eq!(
            buy_at(&mut host, OTHER, START + 20, start_price()),
            Err(CustomContractError::AuctionFinished)
        );

        // Still settled after the window
        claim_eq!(finished_and_deserted(&host, END + 3600), (true, false));
    }

    #[concordium_test]
    fn test_buy_token_transfer_rejected() {
        let mut host = launched_host();
        mock_transfer_rejected(&mut host);

        let result = buy_at(&mut host, BUYER, START, start_price());

        claim_eq!(result, Err(CustomContractError::InvokeContractError));
        claim!(!host.transfer_occurred(&SELLER, start_price()));
    }

    #[concordium_test]
    fn test_buy_payout_rejected() {
        let mut host = launched_host();
        mock_transfer(&mut host, BUYER, TOKEN_COUNT);

        // Contract balance can not cover the payout to the seller
        let ctx = account_ctx(BUYER, START);
        let mut logger = TestLogger::init();
        host.set_self_balance(Amount::zero());

        claim_eq!(
            buy(&ctx, &mut host, start_price(), &mut logger),
            Err(CustomContractError::InvokeTransferError)
        );
    }

    #[concordium_test]
    fn test_finished_and_deserted() {
        let host = launched_host();

        claim_eq!(finished_and_deserted(&host, NOW), (false, false));
        claim_eq!(finished_and_deserted(&host, START), (false, false));
        claim_eq!(finished_and_deserted(&host, END - 1), (false, false));
        claim_eq!(finished_and_deserted(&host, END), (true, true));
        claim_eq!(finished_and_deserted(&host, END + 3600), (true, true));
    }

    #[concordium_test]
    fn test_retrieve_tokens_unlaunched() {
        let mut host = default_host();
        mock_balance(&mut host, 250);
        mock_transfer(&mut host, SELLER, 250);

        claim_eq!(
            retrieve_tokens_as(&mut host, OTHER, NOW),
            Err(CustomContractError::Unauthorized)
        );

        let ctx = account_ctx(SELLER, NOW);
        let mut logger = TestLogger::init();
        claim_eq!(retrieve_tokens(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(logger.logs[0][0], RETRIEVE_TOKENS_TAG);
    }

    #[concordium_test]
    fn test_retrieve_tokens_pending() {
        let mut host = launched_host();
        mock_transfer(&mut host, SELLER, TOKEN_COUNT);

        claim_eq!(
            retrieve_tokens_as(&mut host, SELLER, NOW),
            Err(CustomContractError::AuctionStillActive)
        );
        claim_eq!(
            retrieve_tokens_as(&mut host, SELLER, END - 1),
            Err(CustomContractError::AuctionStillActive)
        );
    }

    #[concordium_test]
    fn test_retrieve_tokens_deserted() {
        let mut host = launched_host();
        mock_transfer(&mut host, SELLER, TOKEN_COUNT);

        claim_eq!(
            retrieve_tokens_as(&mut host, OTHER, END),
            Err(CustomContractError::Unauthorized)
        );
        claim_eq!(retrieve_tokens_as(&mut host, SELLER, END), Ok(()));

        // Nothing left, so nothing is transferred
        mock_balance(&mut host, 0);
        mock_transfer_rejected(&mut host);
        claim_eq!(retrieve_tokens_as(&mut host, SELLER, END + 10), Ok(()));
    }

    #[concordium_test]
    fn test_retrieve_tokens_sold() {
        let mut host = launched_host();
        mock_transfer(&mut host, BUYER, TOKEN_COUNT);
        claim!(buy_at(&mut host, BUYER, START, start_price()).is_ok());

        claim_eq!(
            retrieve_tokens_as(&mut host, SELLER, START),
            Err(CustomContractError::AuctionSold)
        );
        claim_eq!(
            retrieve_tokens_as(&mut host, SELLER, END + 1),
            Err(CustomContractError::AuctionSold)
        );
    }

    #[concordium_test]
    fn test_retrieve_funds() {
        let mut host = launched_host();
        let stray = Amount::from_ccd(5);
        host.set_self_balance(stray);

        let ctx = account_ctx(OTHER, START);
        let mut logger = TestLogger::init();
        claim_eq!(
            retrieve_funds(&ctx, &mut host, &mut logger),
            Err(CustomContractError::Unauthorized)
        );

        // Allowed in every phase
        let ctx = account_ctx(SELLER, START);
        claim_eq!(retrieve_funds(&ctx, &mut host, &mut logger), Ok(()));
        claim!(host.transfer_occurred(&SELLER, stray));
        claim_eq!(host.self_balance(), Amount::zero());
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(logger.logs[0][0], RETRIEVE_FUNDS_TAG);

        // Empty balance is not an error
        claim_eq!(retrieve_funds(&ctx, &mut host, &mut logger), Ok(()));
    }

    #[concordium_test]
    fn test_on_receiving_cis2() {
        let host = default_host();
        let mut logger = TestLogger::init();

        let params = ContractOnReceivingParams {
            token_id: token().id,
            amount: TokenAmountU64(TOKEN_COUNT),
            from: Address::Account(SELLER),
            data: AdditionalData::empty(),
        };
        let bytes = to_bytes(&params);

        let ctx = receive_ctx(Address::Contract(TOKEN_CONTRACT), timestamp(NOW), &bytes);
        claim_eq!(on_receiving_cis2(&ctx, &host, &mut logger), Ok(()));
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(logger.logs[0][0], DEPOSIT_TAG);

        let ctx = receive_ctx(Address::Account(SELLER), timestamp(NOW), &bytes);
        claim_eq!(
            on_receiving_cis2(&ctx, &host, &mut logger),
            Err(CustomContractError::ContractOnly)
        );

        let ctx = receive_ctx(Address::Contract(OTHER_CONTRACT), timestamp(NOW), &bytes);
        claim_eq!(
            on_receiving_cis2(&ctx, &host, &mut logger),
            Err(CustomContractError::UnknownToken)
        );

        let bytes = to_bytes(&ContractOnReceivingParams {
            token_id: TokenIdVec(vec![1]),
            amount: TokenAmountU64(TOKEN_COUNT),
            from: Address::Account(SELLER),
            data: AdditionalData::empty(),
        });
        let ctx = receive_ctx(Address::Contract(TOKEN_CONTRACT), timestamp(NOW), &bytes);
        claim_eq!(
            on_receiving_cis2(&ctx, &host, &mut logger),
            Err(CustomContractError::UnknownToken)
        );
    }

    #[concordium_test]
    fn test_on_receiving_cis2_after_launch() {
        let host = launched_host();
        let mut logger = TestLogger::init();

        let bytes = to_bytes(&ContractOnReceivingParams {
            token_id: token().id,
            amount: TokenAmountU64(1),
            from: Address::Account(OTHER),
            data: AdditionalData::empty(),
        });
        let ctx = receive_ctx(Address::Contract(TOKEN_CONTRACT), timestamp(NOW), &bytes);

        claim_eq!(
            on_receiving_cis2(&ctx, &host, &mut logger),
            Err(CustomContractError::AlreadyLaunched)
        );
    }

    #[concordium_test]
    fn test_view() {
        let mut host = launched_host();
        mock_transfer(&mut host, BUYER, TOKEN_COUNT);

        let result = view(&account_ctx(OTHER, START - 1), &host);
        claim_eq!(
            result.map(|view| view.phase),
            Ok(AuctionPhase::Scheduled)
        );

        claim!(buy_at(&mut host, BUYER, START, start_price()).is_ok());

        let result = view(&account_ctx(OTHER, END + 1), &host);
        claim_eq!(
            result,
            Ok(AuctionView {
                seller: SELLER,
                token: token(),
                phase: AuctionPhase::Settled,
                terms: host.state().terms().cloned(),
                sale: Some(Sale {
                    buyer: BUYER,
                    price: start_price(),
                }),
            })
        );
    }

    #[concordium_test]
    fn test_get_token_balance() {
        let mut host = default_host();
        mock_balance(&mut host, 42);

        let result = get_token_balance(&account_ctx(OTHER, NOW), &host);

        claim_eq!(result, Ok(TokenAmountU64(42)));
    }
}
