//! Domain types with validation support.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::money::Amount;

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Transfer,
    Reversal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Transfer => "TRANSFER",
            Self::Reversal => "REVERSAL",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(Self::Deposit),
            "TRANSFER" => Ok(Self::Transfer),
            "REVERSAL" => Ok(Self::Reversal),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Processing state of a transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Accepted but not yet settled by the ledger
    #[default]
    Pending,
    /// Settled
    Completed,
    /// Negated by a later reversal
    Reversed,
    /// Rejected by the ledger
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Reversed => "REVERSED",
            Self::Failed => "FAILED",
        }
    }

    /// Whether the ledger will no longer change this entry.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "REVERSED" => Ok(Self::Reversed),
            "FAILED" => Ok(Self::Failed),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a transfer relative to the session holder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionDirection {
    Received,
    Sent,
}

/// Counterparty of a transfer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OtherParty {
    pub id: String,
    pub name: String,
}

/// A ledger entry as reported by the wallet API.
///
/// Fetched, never constructed locally; the ledger owns these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Amount,
    pub status: TransactionStatus,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Settlement time; absent while the entry is pending
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<TransactionDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_party: Option<OtherParty>,
}

impl Transaction {
    /// A reversal may only target a settled entry that is not itself a
    /// reversal.
    #[must_use]
    pub fn is_reversible(&self) -> bool {
        self.status == TransactionStatus::Completed
            && self.transaction_type != TransactionType::Reversal
    }
}

/// The authenticated user's wallet summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserWallet {
    pub id: String,
    pub balance: Amount,
}

/// Account profile as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub wallet: UserWallet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Successful login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: SecretString,
    pub user: User,
}

/// Current balance of the session holder's wallet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub balance: Amount,
    pub wallet_id: String,
}

/// Response to a deposit or transfer: the created transaction plus the
/// wallet balance after the mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub new_balance: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_balance: Option<Amount>,
}

/// Response to a reversal request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReversalResponse {
    pub message: String,
    pub reversal_transaction: Transaction,
    pub new_balance: Amount,
}

/// Account registration payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 100, message = "Nome deve ter entre 3 e 100 caracteres"))]
    pub name: String,
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    #[validate(length(min = 6, max = 100, message = "Senha deve ter entre 6 e 100 caracteres"))]
    pub password: String,
    #[validate(custom(function = crate::domain::cpf::validate))]
    pub cpf: String,
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    #[validate(length(min = 1, message = "Senha é obrigatória"))]
    pub password: String,
}

/// Deposit payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DepositRequest {
    #[validate(custom(function = crate::domain::money::validate_entry))]
    pub amount: Amount,
    #[validate(length(max = 255, message = "Descrição deve ter no máximo 255 caracteres"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Peer-to-peer transfer payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[validate(custom(function = crate::domain::cpf::validate))]
    pub recipient_cpf: String,
    #[validate(custom(function = crate::domain::money::validate_entry))]
    pub amount: Amount,
    #[validate(length(max = 255, message = "Descrição deve ter no máximo 255 caracteres"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Uniform outcome of every remote operation.
///
/// Either `{"success": true, "data": ...}` or
/// `{"success": false, "error": "..."}`. Service methods return this shape
/// instead of raising; every failure path is folded into it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionResult<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ActionResult<T> {
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn into_result(self) -> Result<T, String> {
        if self.success {
            self.data.ok_or_else(|| "Resposta sem dados".to_string())
        } else {
            Err(self
                .error
                .unwrap_or_else(|| "Erro desconhecido".to_string()))
        }
    }
}

/// First human-readable message out of a set of field validation failures.
pub fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Dados inválidos".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_transaction_type_display_and_parsing() {
        let types = vec![
            (TransactionType::Deposit, "DEPOSIT"),
            (TransactionType::Transfer, "TRANSFER"),
            (TransactionType::Reversal, "REVERSAL"),
        ];

        for (transaction_type, string) in types {
            assert_eq!(transaction_type.as_str(), string);
            assert_eq!(transaction_type.to_string(), string);
            assert_eq!(TransactionType::from_str(string).unwrap(), transaction_type);
        }

        assert!(TransactionType::from_str("invalid").is_err());
    }

    #[test]
    fn test_transaction_status_display_and_parsing() {
        let statuses = vec![
            (TransactionStatus::Pending, "PENDING"),
            (TransactionStatus::Completed, "COMPLETED"),
            (TransactionStatus::Reversed, "REVERSED"),
            (TransactionStatus::Failed, "FAILED"),
        ];

        for (status, string) in statuses {
            assert_eq!(status.as_str(), string);
            assert_eq!(status.to_string(), string);
            assert_eq!(TransactionStatus::from_str(string).unwrap(), status);
        }

        assert!(TransactionStatus::from_str("invalid").is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Completed.is_terminal());
        assert!(TransactionStatus::Reversed.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
    }

    fn sample_transaction(
        transaction_type: TransactionType,
        status: TransactionStatus,
    ) -> Transaction {
        Transaction {
            id: "tx_1".to_string(),
            transaction_type,
            amount: Amount::from_centavos(1_000),
            status,
            description: String::new(),
            created_at: Utc::now(),
            processed_at: None,
            direction: None,
            other_party: None,
        }
    }

    #[test]
    fn test_reversal_eligibility() {
        let eligible = sample_transaction(TransactionType::Transfer, TransactionStatus::Completed);
        assert!(eligible.is_reversible());

        let reversed = sample_transaction(TransactionType::Transfer, TransactionStatus::Reversed);
        assert!(!reversed.is_reversible());

        let reversal = sample_transaction(TransactionType::Reversal, TransactionStatus::Completed);
        assert!(!reversal.is_reversible());

        let pending = sample_transaction(TransactionType::Deposit, TransactionStatus::Pending);
        assert!(!pending.is_reversible());
    }

    #[test]
    fn test_transaction_deserialization_from_api_shape() {
        let json = serde_json::json!({
            "id": "9a1f6c2e-0000-0000-0000-000000000001",
            "type": "TRANSFER",
            "amount": 12.34,
            "status": "COMPLETED",
            "description": "Aluguel",
            "createdAt": "2025-03-01T12:00:00Z",
            "processedAt": "2025-03-01T12:00:01Z",
            "direction": "sent",
            "otherParty": {"id": "u2", "name": "Maria"}
        });

        let tx: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Transfer);
        assert_eq!(tx.amount.centavos(), 1_234);
        assert_eq!(tx.direction, Some(TransactionDirection::Sent));
        assert_eq!(tx.other_party.unwrap().name, "Maria");
    }

    #[test]
    fn test_mutation_response_flattens_transaction() {
        let json = serde_json::json!({
            "id": "tx_9",
            "type": "DEPOSIT",
            "amount": 50.0,
            "status": "COMPLETED",
            "description": "",
            "createdAt": "2025-03-01T12:00:00Z",
            "newBalance": 150.0,
            "previousBalance": 100.0
        });

        let response: MutationResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.transaction.id, "tx_9");
        assert_eq!(response.new_balance.centavos(), 15_000);
        assert_eq!(response.previous_balance.unwrap().centavos(), 10_000);
    }

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            name: "João Silva".to_string(),
            email: "joao@example.com".to_string(),
            password: "secret123".to_string(),
            cpf: "52998224725".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_name = RegisterRequest {
            name: "Jo".to_string(),
            ..valid.clone()
        };
        assert!(bad_name.validate().is_err());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let bad_cpf = RegisterRequest {
            cpf: "12345678900".to_string(),
            ..valid.clone()
        };
        let errors = bad_cpf.validate().unwrap_err();
        assert_eq!(first_validation_message(&errors), "CPF inválido");
    }

    #[test]
    fn test_transfer_request_validation() {
        let valid = TransferRequest {
            recipient_cpf: "529.982.247-25".to_string(),
            amount: Amount::from_centavos(150),
            description: None,
        };
        assert!(valid.validate().is_ok());

        let zero = TransferRequest {
            amount: Amount::from_centavos(0),
            ..valid.clone()
        };
        assert!(zero.validate().is_err());

        let over_limit = TransferRequest {
            amount: Amount::from_centavos(100_000_001),
            ..valid.clone()
        };
        assert!(over_limit.validate().is_err());

        let long_description = TransferRequest {
            description: Some("x".repeat(256)),
            ..valid
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_transfer_request_wire_names() {
        let request = TransferRequest {
            recipient_cpf: "52998224725".to_string(),
            amount: Amount::from_centavos(150),
            description: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["recipientCpf"], "52998224725");
        assert_eq!(json["amount"], 1.5);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_action_result_shape() {
        let ok: ActionResult<u32> = ActionResult::ok(7);
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 7}));
        assert_eq!(ok.into_result(), Ok(7));

        let failed: ActionResult<u32> = ActionResult::failure("Saldo insuficiente");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Saldo insuficiente"})
        );
        assert_eq!(failed.into_result(), Err("Saldo insuficiente".to_string()));
    }
}
