use super::*;

/// The custom errors the auction contracts can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Sender is not allowed to perform this action (Error code: -4).
    Unauthorized,
    /// Seller is not allowed to buy their own lot (Error code: -5).
    OwnerForbidden,
    /// Only account addresses can call this function (Error code: -6).
    OnlyAccountAddress,
    /// This function must only be called by a contract (Error code: -7).
    ContractOnly,
    /// Auction was already launched (Error code: -8).
    AlreadyLaunched,
    /// Auction was not launched yet (Error code: -9).
    AuctionNotLaunched,
    /// Bidding window has not opened yet (Error code: -10).
    AuctionNotStarted,
    /// Auction was either settled or its bidding window is closed (Error code: -11).
    AuctionFinished,
    /// Auction is launched and has not finished yet (Error code: -12).
    AuctionStillActive,
    /// Lot was already sold (Error code: -13).
    AuctionSold,
    /// Auction start must be in the future (Error code: -14).
    InvalidStartTime,
    /// Auction end must be after its start (Error code: -15).
    InvalidEndTime,
    /// Start price must be positive (Error code: -16).
    ZeroStartPrice,
    /// Reservation price must be below the start price (Error code: -17).
    InvalidReservationPrice,
    /// Attached amount is below the current price (Error code: -18).
    InsufficientPayment,
    /// Auction can not be launched without tokens (Error code: -19).
    EmptyLot,
    /// Token is not the one bound to this auction (Error code: -20).
    UnknownToken,
    /// Failed to invoke a contract (Error code: -21).
    InvokeContractError,
    /// Failed to invoke a transfer (Error code: -22).
    InvokeTransferError,
    /// Invoked contract does not behave like a CIS-2 token (Error code: -23).
    Incompatible,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to contract invocations to CustomContractError.
impl<T> From<CallContractError<T>> for CustomContractError {
    fn from(cce: CallContractError<T>) -> Self {
        match cce {
            CallContractError::MissingEntrypoint | CallContractError::MessageFailed => {
                Self::Incompatible
            }
            _ => Self::InvokeContractError,
        }
    }
}

/// Mapping errors related to CCD transfers to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::InvokeTransferError
    }
}

/// Error of a read-only query to another contract.
#[derive(Debug)]
pub enum ContractReadError<R> {
    Call(CallContractError<R>),
    Compatibility,
    Parse,
}

impl<R> From<ContractReadError<R>> for CustomContractError {
    fn from(cre: ContractReadError<R>) -> Self {
        match cre {
            ContractReadError::Call(cce) => cce.into(),
            ContractReadError::Compatibility | ContractReadError::Parse => Self::Incompatible,
        }
    }
}
