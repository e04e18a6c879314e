use super::*;

/// Auction terms fixed by `launchAuction`.
#[derive(Debug, Serialize, SchemaType, Clone, PartialEq, Eq)]
pub struct AuctionTerms {
    /// Bidding window opens at this time.
    pub start: Timestamp,
    /// Bidding window closes at this time, exclusive.
    pub end: Timestamp,
    /// Price of the whole lot when the window opens.
    pub start_price: Amount,
    /// Price the lot decays towards when the window closes.
    pub reservation_price: Amount,
    /// Tokens held by the auction at launch. The whole lot goes to the buyer.
    pub token_count: ContractTokenAmount,
}

impl AuctionTerms {
    /// Lot price at `slot_time`, decaying linearly from `start_price` towards
    /// `reservation_price`. Only defined inside the bidding window.
    pub fn price_at(&self, slot_time: Timestamp) -> Amount {
        let start = self.start.timestamp_millis();
        let duration = u128::from(self.end.timestamp_millis().saturating_sub(start));
        let elapsed = u128::from(slot_time.timestamp_millis().saturating_sub(start)).min(duration);
        let spread = u128::from(
            self.start_price
                .micro_ccd
                .saturating_sub(self.reservation_price.micro_ccd),
        );

        // elapsed <= duration, so decay <= spread and fits in u64
        let decay = if duration == 0 {
            spread
        } else {
            spread * elapsed / duration
        };

        Amount::from_micro_ccd(self.start_price.micro_ccd.saturating_sub(decay as u64))
    }
}

/// Accepted bid.
#[derive(Debug, Serialize, SchemaType, Clone, PartialEq, Eq)]
pub struct Sale {
    pub buyer: AccountAddress,
    /// Price paid to the seller.
    pub price: Amount,
}

/// Stored auction stage. Stages only ever move forward.
#[derive(Debug, Serialize, SchemaType, Clone, PartialEq, Eq)]
pub enum AuctionStage {
    /// Deployed, possibly funded, terms not set yet.
    Unlaunched,
    /// Terms are set; bidding window may be ahead, open or over.
    Launched(AuctionTerms),
    /// Lot was sold.
    Settled(AuctionTerms, Sale),
}

/// Auction phase at a given slot time, derived from the stored stage.
#[derive(Debug, Serialize, SchemaType, Clone, Copy, PartialEq, Eq)]
pub enum AuctionPhase {
    Unlaunched,
    /// Launched, bidding window not open yet.
    Scheduled,
    /// Bidding window is open.
    Bidding,
    Settled,
    /// Bidding window closed without a buyer.
    Deserted,
}

impl AuctionPhase {
    pub fn is_finished(self) -> bool {
        matches!(self, AuctionPhase::Settled | AuctionPhase::Deserted)
    }

    pub fn is_deserted(self) -> bool {
        matches!(self, AuctionPhase::Deserted)
    }

    fn ensure_bidding(self) -> ContractResult<()> {
        match self {
            AuctionPhase::Bidding => Ok(()),
            AuctionPhase::Unlaunched => bail!(CustomContractError::AuctionNotLaunched),
            AuctionPhase::Scheduled => bail!(CustomContractError::AuctionNotStarted),
            AuctionPhase::Settled | AuctionPhase::Deserted => {
                bail!(CustomContractError::AuctionFinished)
            }
        }
    }
}

/// Outcome of an accepted bid. Every part of it MUST be transferred.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Amount owed to the seller.
    pub price: Amount,
    /// Overpayment owed back to the buyer.
    pub refund: Amount,
    /// Tokens owed to the buyer.
    pub token_count: ContractTokenAmount,
}

/// The contract state.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Deployer of the auction. Launches it and recovers what is left.
    pub seller: AccountAddress,
    /// Auctioned token.
    pub token: Token,
    pub stage: AuctionStage,
    pub phantom_data: PhantomData<S>,
}

impl<S: HasStateApi> State<S> {
    /// Creates an unlaunched auction for `token`.
    pub fn new(seller: AccountAddress, token: Token) -> Self {
        Self {
            seller,
            token,
            stage: AuctionStage::Unlaunched,
            phantom_data: PhantomData,
        }
    }

    pub fn terms(&self) -> Option<&AuctionTerms> {
        match &self.stage {
            AuctionStage::Unlaunched => None,
            AuctionStage::Launched(terms) | AuctionStage::Settled(terms, _) => Some(terms),
        }
    }

    pub fn sale(&self) -> Option<&Sale> {
        match &self.stage {
            AuctionStage::Settled(_, sale) => Some(sale),
            _ => None,
        }
    }

    pub fn phase(&self, slot_time: Timestamp) -> AuctionPhase {
        match &self.stage {
            AuctionStage::Unlaunched => AuctionPhase::Unlaunched,
            AuctionStage::Settled(..) => AuctionPhase::Settled,
            AuctionStage::Launched(terms) => {
                if slot_time < terms.start {
                    AuctionPhase::Scheduled
                } else if slot_time < terms.end {
                    AuctionPhase::Bidding
                } else {
                    AuctionPhase::Deserted
                }
            }
        }
    }

    pub fn ensure_seller(&self, sender: &Address) -> ContractResult<()> {
        ensure!(
            sender.matches_account(&self.seller),
            CustomContractError::Unauthorized
        );
        Ok(())
    }

    /// Checks everything about a launch that does not need the token balance.
    pub fn ensure_launchable(
        &self,
        sender: &Address,
        params: &LaunchParams,
        slot_time: Timestamp,
    ) -> ContractResult<()> {
        self.ensure_seller(sender)?;
        ensure_eq!(
            self.stage,
            AuctionStage::Unlaunched,
            CustomContractError::AlreadyLaunched
        );
        ensure!(
            params.start > slot_time,
            CustomContractError::InvalidStartTime
        );
        ensure!(params.end > params.start, CustomContractError::InvalidEndTime);
        ensure!(
            params.start_price > Amount::zero(),
            CustomContractError::ZeroStartPrice
        );
        ensure!(
            params.reservation_price < params.start_price,
            CustomContractError::InvalidReservationPrice
        );
        Ok(())
    }

    /// Fix the auction terms. `token_count` is the balance held at launch.
    pub fn launch(
        &mut self,
        params: LaunchParams,
        token_count: ContractTokenAmount,
    ) -> ContractResult<()> {
        ensure_eq!(
            self.stage,
            AuctionStage::Unlaunched,
            CustomContractError::AlreadyLaunched
        );
        ensure!(token_count.0 > 0, CustomContractError::EmptyLot);

        self.stage = AuctionStage::Launched(AuctionTerms {
            start: params.start,
            end: params.end,
            start_price: params.start_price,
            reservation_price: params.reservation_price,
            token_count,
        });
        Ok(())
    }

    pub fn current_price(&self, slot_time: Timestamp) -> ContractResult<Amount> {
        self.phase(slot_time).ensure_bidding()?;
        let terms = self
            .terms()
            .ok_or(CustomContractError::AuctionNotLaunched)?;
        Ok(terms.price_at(slot_time))
    }

    /// Accept a bid of `amount` from `buyer` and mark the lot as sold.
    ///
    /// The returned settlement still has to be paid out by the caller.
    pub fn settle(
        &mut self,
        buyer: AccountAddress,
        amount: Amount,
        slot_time: Timestamp,
    ) -> ContractResult<Settlement> {
        let price = self.current_price(slot_time)?;

        // Seller is not allowed to buy their own lot
        ensure_ne!(buyer, self.seller, CustomContractError::OwnerForbidden);
        ensure!(amount >= price, CustomContractError::InsufficientPayment);

        let terms = self
            .terms()
            .cloned()
            .ok_or(CustomContractError::AuctionNotLaunched)?;
        let token_count = terms.token_count;
        self.stage = AuctionStage::Settled(terms, Sale { buyer, price });

        Ok(Settlement {
            price,
            refund: Amount::from_micro_ccd(amount.micro_ccd - price.micro_ccd),
            token_count,
        })
    }

    /// Tokens can be recovered before launch or once the auction is deserted.
    pub fn ensure_tokens_retrievable(
        &self,
        sender: &Address,
        slot_time: Timestamp,
    ) -> ContractResult<()> {
        self.ensure_seller(sender)?;
        match self.phase(slot_time) {
            AuctionPhase::Unlaunched | AuctionPhase::Deserted => Ok(()),
            AuctionPhase::Scheduled | AuctionPhase::Bidding => {
                bail!(CustomContractError::AuctionStillActive)
            }
            AuctionPhase::Settled => bail!(CustomContractError::AuctionSold),
        }
    }

    /// Only the auctioned token is accepted, and only while the lot is open.
    pub fn ensure_deposit(
        &self,
        sender: &Address,
        token_id: &ContractTokenId,
    ) -> ContractResult<()> {
        let contract = match sender {
            Address::Contract(contract) => contract,
            Address::Account(_) => bail!(CustomContractError::ContractOnly),
        };
        ensure!(
            *contract == self.token.contract && *token_id == self.token.id,
            CustomContractError::UnknownToken
        );
        ensure_eq!(
            self.stage,
            AuctionStage::Unlaunched,
            CustomContractError::AlreadyLaunched
        );
        Ok(())
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_cis2::{TokenAmountU64, TokenIdVec};
    use test_infrastructure::*;

    const SELLER: AccountAddress = AccountAddress([0; 32]);
    const BUYER: AccountAddress = AccountAddress([1; 32]);

    const TOKEN_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };

    const SECOND: u64 = 1000;

    fn timestamp(seconds: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(seconds * SECOND)
    }

    fn terms() -> AuctionTerms {
        AuctionTerms {
            start: timestamp(1000),
            end: timestamp(2000),
            start_price: Amount::from_micro_ccd(10),
            reservation_price: Amount::from_micro_ccd(1),
            token_count: TokenAmountU64(1000),
        }
    }

    fn launched_state() -> State<TestStateApi> {
        let mut state = State::new(
            SELLER,
            Token {
                contract: TOKEN_CONTRACT,
                id: TokenIdVec(vec![]),
            },
        );
        state.stage = AuctionStage::Launched(terms());
        state
    }

    #[concordium_test]
    fn test_price_at_half_window() {
        // 10 - floor(9 * 500 / 1000) = 6
        claim_eq!(terms().price_at(timestamp(1500)), Amount::from_micro_ccd(6));
    }

    #[concordium_test]
    fn test_price_bounds() {
        let terms = terms();
        claim_eq!(terms.price_at(terms.start), terms.start_price);

        let last_millisecond = Timestamp::from_timestamp_millis(terms.end.timestamp_millis() - 1);
        claim_eq!(terms.price_at(last_millisecond), Amount::from_micro_ccd(2));
    }

    #[concordium_test]
    fn test_price_never_increases() {
        let terms = AuctionTerms {
            start_price: Amount::from_ccd(10),
            reservation_price: Amount::from_ccd(1),
            ..terms()
        };

        let mut previous = terms.start_price;
        for millis in (terms.start.timestamp_millis()..terms.end.timestamp_millis()).step_by(997) {
            let price = terms.price_at(Timestamp::from_timestamp_millis(millis));
            claim!(price <= previous, "Price must not increase over time");
            claim!(price >= terms.reservation_price, "Price fell below reservation");
            previous = price;
        }
    }

    #[concordium_test]
    fn test_price_large_amounts() {
        let terms = AuctionTerms {
            start_price: Amount::from_micro_ccd(u64::MAX),
            reservation_price: Amount::zero(),
            ..terms()
        };

        // u64::MAX - floor(u64::MAX / 2)
        claim_eq!(
            terms.price_at(timestamp(1500)),
            Amount::from_micro_ccd(u64::MAX - u64::MAX / 2)
        );
    }

    #[concordium_test]
    fn test_phase_transitions() {
        let state = launched_state();

        claim_eq!(state.phase(timestamp(999)), AuctionPhase::Scheduled);
        claim_eq!(state.phase(timestamp(1000)), AuctionPhase::Bidding);
        claim_eq!(state.phase(timestamp(1999)), AuctionPhase::Bidding);
        claim_eq!(state.phase(timestamp(2000)), AuctionPhase::Deserted);
        claim!(state.phase(timestamp(2000)).is_deserted());
        claim!(!state.phase(timestamp(1999)).is_finished());
    }

    #[concordium_test]
    fn test_settle_marks_lot_sold() {
        let mut state = launched_state();

        let settlement = state.settle(BUYER, Amount::from_micro_ccd(8), timestamp(1500));

        claim_eq!(
            settlement,
            Ok(Settlement {
                price: Amount::from_micro_ccd(6),
                refund: Amount::from_micro_ccd(2),
                token_count: TokenAmountU64(1000),
            })
        );
        claim_eq!(state.phase(timestamp(1500)), AuctionPhase::Settled);
        claim_eq!(state.phase(timestamp(5000)), AuctionPhase::Settled);
        claim_eq!(
            state.sale(),
            Some(&Sale {
                buyer: BUYER,
                price: Amount::from_micro_ccd(6),
            })
        );

        // Lot can only be sold once
        claim_eq!(
            state.settle(BUYER, Amount::from_micro_ccd(10), timestamp(1600)),
            Err(CustomContractError::AuctionFinished)
        );
    }

    #[concordium_test]
    fn test_settle_rejections_keep_state() {
        let mut state = launched_state();

        claim_eq!(
            state.settle(SELLER, Amount::from_micro_ccd(10), timestamp(1500)),
            Err(CustomContractError::OwnerForbidden)
        );
        claim_eq!(
            state.settle(BUYER, Amount::from_micro_ccd(5), timestamp(1500)),
            Err(CustomContractError::InsufficientPayment)
        );
        claim_eq!(
            state.settle(BUYER, Amount::from_micro_ccd(10), timestamp(999)),
            Err(CustomContractError::AuctionNotStarted)
        );
        claim_eq!(state.stage, AuctionStage::Launched(terms()));
    }
}
