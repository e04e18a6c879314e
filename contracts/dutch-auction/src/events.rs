use super::*;

/// Launch event data.
#[derive(Debug, Serial)]
pub struct LaunchEvent<'a> {
    /// Seller account address.
    pub seller: &'a AccountAddress,
    /// Auctioned token.
    pub token: &'a Token,
    /// Terms the auction was launched with.
    pub terms: &'a AuctionTerms,
}

/// Buy event data.
#[derive(Debug, Serial)]
pub struct BuyEvent<'a> {
    /// Buyer account address.
    pub buyer: &'a AccountAddress,
    /// Price paid to the seller.
    pub price: Amount,
    /// Overpayment returned to the buyer.
    pub refund: Amount,
    /// Tokens delivered to the buyer.
    pub token_count: ContractTokenAmount,
}

/// Token deposit event data.
#[derive(Debug, Serial)]
pub struct DepositEvent<'a> {
    /// Previous owner of the deposited tokens.
    pub from: &'a Address,
    pub amount: ContractTokenAmount,
}

/// Unsold token recovery event data.
#[derive(Debug, Serial)]
pub struct RetrieveTokensEvent<'a> {
    /// Seller account address.
    pub seller: &'a AccountAddress,
    pub amount: ContractTokenAmount,
}

/// Stray CCD recovery event data.
#[derive(Debug, Serial)]
pub struct RetrieveFundsEvent<'a> {
    /// Seller account address.
    pub seller: &'a AccountAddress,
    pub amount: Amount,
}

/// Tagged auction event to be serialized for the event log.
#[derive(Debug)]
pub enum AuctionEvent<'a> {
    Launch(LaunchEvent<'a>),
    Buy(BuyEvent<'a>),
    Deposit(DepositEvent<'a>),
    RetrieveTokens(RetrieveTokensEvent<'a>),
    RetrieveFunds(RetrieveFundsEvent<'a>),
}

impl<'a> AuctionEvent<'a> {
    pub fn launch(seller: &'a AccountAddress, token: &'a Token, terms: &'a AuctionTerms) -> Self {
        Self::Launch(LaunchEvent {
            seller,
            token,
            terms,
        })
    }

    pub fn buy(buyer: &'a AccountAddress, settlement: &Settlement) -> Self {
        Self::Buy(BuyEvent {
            buyer,
            price: settlement.price,
            refund: settlement.refund,
            token_count: settlement.token_count,
        })
    }

    pub fn deposit(from: &'a Address, amount: ContractTokenAmount) -> Self {
        Self::Deposit(DepositEvent { from, amount })
    }

    pub fn retrieve_tokens(seller: &'a AccountAddress, amount: ContractTokenAmount) -> Self {
        Self::RetrieveTokens(RetrieveTokensEvent { seller, amount })
    }

    pub fn retrieve_funds(seller: &'a AccountAddress, amount: Amount) -> Self {
        Self::RetrieveFunds(RetrieveFundsEvent { seller, amount })
    }
}

impl<'a> Serial for AuctionEvent<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            AuctionEvent::Launch(event) => {
                out.write_u8(LAUNCH_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Buy(event) => {
                out.write_u8(BUY_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Deposit(event) => {
                out.write_u8(DEPOSIT_TAG)?;
                event.serial(out)
            }
            AuctionEvent::RetrieveTokens(event) => {
                out.write_u8(RETRIEVE_TOKENS_TAG)?;
                event.serial(out)
            }
            AuctionEvent::RetrieveFunds(event) => {
                out.write_u8(RETRIEVE_FUNDS_TAG)?;
                event.serial(out)
            }
        }
    }
}
