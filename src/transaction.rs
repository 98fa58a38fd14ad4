//! Stellar transaction envelopes: the protocol the txrep format was designed for.
//!
//! Type and field names follow the Stellar XDR definitions so that rendered field names
//! (`tx.operations[0].body.paymentOp.amount`) match what other tools produce.

use crate::ast::{
    Definitions, Discriminant, EnumDef, FieldDef, Schema, SchemaError, StructDef, TypeSpec,
    UnionArm, UnionDef,
};
use crate::codec::Codec;

pub const ENVELOPE: &str = "TransactionEnvelope";

/// Most operations per transaction.
pub const MAX_OPS_PER_TX: u32 = 100;
/// Most signatures per envelope.
pub const MAX_SIGNATURES: u32 = 20;

fn f(name: &str, spec: TypeSpec) -> FieldDef {
    FieldDef::new(name, spec)
}

fn arm(symbol: &str, name: &str, spec: TypeSpec) -> UnionArm {
    UnionArm::symbols(&[symbol], Some(f(name, spec)))
}

fn void_arm(symbol: &str) -> UnionArm {
    UnionArm::symbols(&[symbol], None)
}

fn st(name: &str) -> TypeSpec {
    TypeSpec::struct_ref(name)
}

fn opt(spec: TypeSpec) -> TypeSpec {
    TypeSpec::optional(spec)
}

/// `union switch (int v) { case 0: void; }`
fn empty_ext(name: &str) -> UnionDef {
    UnionDef::new(name, "v", Discriminant::Int, vec![UnionArm::values(&[0], None)])
}

fn enums() -> Vec<EnumDef> {
    vec![
        EnumDef::new(
            "EnvelopeType",
            &[
                ("ENVELOPE_TYPE_TX_V0", 0),
                ("ENVELOPE_TYPE_SCP", 1),
                ("ENVELOPE_TYPE_TX", 2),
                ("ENVELOPE_TYPE_AUTH", 3),
                ("ENVELOPE_TYPE_SCPVALUE", 4),
                ("ENVELOPE_TYPE_TX_FEE_BUMP", 5),
                ("ENVELOPE_TYPE_OP_ID", 6),
            ],
        ),
        EnumDef::new(
            "MemoType",
            &[
                ("MEMO_NONE", 0),
                ("MEMO_TEXT", 1),
                ("MEMO_ID", 2),
                ("MEMO_HASH", 3),
                ("MEMO_RETURN", 4),
            ],
        ),
        EnumDef::new(
            "AssetType",
            &[
                ("ASSET_TYPE_NATIVE", 0),
                ("ASSET_TYPE_CREDIT_ALPHANUM4", 1),
                ("ASSET_TYPE_CREDIT_ALPHANUM12", 2),
            ],
        ),
        EnumDef::new(
            "OperationType",
            &[
                ("CREATE_ACCOUNT", 0),
                ("PAYMENT", 1),
                ("PATH_PAYMENT_STRICT_RECEIVE", 2),
                ("MANAGE_SELL_OFFER", 3),
                ("CREATE_PASSIVE_SELL_OFFER", 4),
                ("SET_OPTIONS", 5),
                ("CHANGE_TRUST", 6),
                ("ALLOW_TRUST", 7),
                ("ACCOUNT_MERGE", 8),
                ("INFLATION", 9),
                ("MANAGE_DATA", 10),
                ("BUMP_SEQUENCE", 11),
                ("MANAGE_BUY_OFFER", 12),
                ("PATH_PAYMENT_STRICT_SEND", 13),
            ],
        ),
    ]
}

fn structs() -> Vec<StructDef> {
    let signatures = || {
        f(
            "signatures",
            TypeSpec::vec(TypeSpec::DecoratedSignature, MAX_SIGNATURES),
        )
    };
    let operations = || {
        f(
            "operations",
            TypeSpec::vec(st("Operation"), MAX_OPS_PER_TX),
        )
    };
    vec![
        StructDef::new(
            "TimeBounds",
            vec![f("minTime", TypeSpec::Time), f("maxTime", TypeSpec::Time)],
        ),
        StructDef::new(
            "Price",
            vec![f("n", TypeSpec::Int), f("d", TypeSpec::Int)],
        ),
        StructDef::new(
            "Signer",
            vec![f("key", TypeSpec::SignerKey), f("weight", TypeSpec::UInt)],
        ),
        StructDef::new(
            "TransactionV0",
            vec![
                f("sourceAccountEd25519", TypeSpec::FixedOpaque(32)),
                f("fee", TypeSpec::UInt),
                f("seqNum", TypeSpec::Hyper),
                f("timeBounds", opt(st("TimeBounds"))),
                f("memo", TypeSpec::union_ref("Memo")),
                operations(),
                f("ext", TypeSpec::union_ref("TransactionV0Ext")),
            ],
        ),
        StructDef::new(
            "TransactionV0Envelope",
            vec![f("tx", st("TransactionV0")), signatures()],
        ),
        StructDef::new(
            "Transaction",
            vec![
                f("sourceAccount", TypeSpec::AccountId),
                f("fee", TypeSpec::UInt),
                f("seqNum", TypeSpec::Hyper),
                f("timeBounds", opt(st("TimeBounds"))),
                f("memo", TypeSpec::union_ref("Memo")),
                operations(),
                f("ext", TypeSpec::union_ref("TransactionExt")),
            ],
        ),
        StructDef::new(
            "TransactionV1Envelope",
            vec![f("tx", st("Transaction")), signatures()],
        ),
        StructDef::new(
            "FeeBumpTransaction",
            vec![
                f("feeSource", TypeSpec::AccountId),
                f("fee", TypeSpec::Amount),
                f("innerTx", TypeSpec::union_ref("FeeBumpInnerTx")),
                f("ext", TypeSpec::union_ref("FeeBumpTransactionExt")),
            ],
        ),
        StructDef::new(
            "FeeBumpTransactionEnvelope",
            vec![f("tx", st("FeeBumpTransaction")), signatures()],
        ),
        StructDef::new(
            "Operation",
            vec![
                f("sourceAccount", opt(TypeSpec::AccountId)),
                f("body", TypeSpec::union_ref("OperationBody")),
            ],
        ),
        StructDef::new(
            "CreateAccountOp",
            vec![
                f("destination", TypeSpec::AccountId),
                f("startingBalance", TypeSpec::Amount),
            ],
        ),
        StructDef::new(
            "PaymentOp",
            vec![
                f("destination", TypeSpec::AccountId),
                f("asset", TypeSpec::Asset),
                f("amount", TypeSpec::Amount),
            ],
        ),
        StructDef::new(
            "PathPaymentStrictReceiveOp",
            vec![
                f("sendAsset", TypeSpec::Asset),
                f("sendMax", TypeSpec::Amount),
                f("destination", TypeSpec::AccountId),
                f("destAsset", TypeSpec::Asset),
                f("destAmount", TypeSpec::Amount),
                f("path", TypeSpec::vec(TypeSpec::Asset, 5)),
            ],
        ),
        StructDef::new(
            "PathPaymentStrictSendOp",
            vec![
                f("sendAsset", TypeSpec::Asset),
                f("sendAmount", TypeSpec::Amount),
                f("destination", TypeSpec::AccountId),
                f("destAsset", TypeSpec::Asset),
                f("destMin", TypeSpec::Amount),
                f("path", TypeSpec::vec(TypeSpec::Asset, 5)),
            ],
        ),
        StructDef::new(
            "ManageSellOfferOp",
            vec![
                f("selling", TypeSpec::Asset),
                f("buying", TypeSpec::Asset),
                f("amount", TypeSpec::Amount),
                f("price", st("Price")),
                f("offerID", TypeSpec::Amount),
            ],
        ),
        StructDef::new(
            "ManageBuyOfferOp",
            vec![
                f("selling", TypeSpec::Asset),
                f("buying", TypeSpec::Asset),
                f("buyAmount", TypeSpec::Amount),
                f("price", st("Price")),
                f("offerID", TypeSpec::Amount),
            ],
        ),
        StructDef::new(
            "CreatePassiveSellOfferOp",
            vec![
                f("selling", TypeSpec::Asset),
                f("buying", TypeSpec::Asset),
                f("amount", TypeSpec::Amount),
                f("price", st("Price")),
            ],
        ),
        StructDef::new(
            "SetOptionsOp",
            vec![
                f("inflationDest", opt(TypeSpec::AccountId)),
                f("clearFlags", opt(TypeSpec::UInt)),
                f("setFlags", opt(TypeSpec::UInt)),
                f("masterWeight", opt(TypeSpec::UInt)),
                f("lowThreshold", opt(TypeSpec::UInt)),
                f("medThreshold", opt(TypeSpec::UInt)),
                f("highThreshold", opt(TypeSpec::UInt)),
                f("homeDomain", opt(TypeSpec::String(32))),
                f("signer", opt(st("Signer"))),
            ],
        ),
        StructDef::new(
            "ChangeTrustOp",
            vec![f("line", TypeSpec::Asset), f("limit", TypeSpec::Amount)],
        ),
        StructDef::new(
            "AllowTrustOp",
            vec![
                f("trustor", TypeSpec::AccountId),
                f("asset", TypeSpec::union_ref("AllowTrustAsset")),
                f("authorize", TypeSpec::UInt),
            ],
        ),
        StructDef::new(
            "ManageDataOp",
            vec![
                f("dataName", TypeSpec::String(64)),
                f("dataValue", opt(TypeSpec::VarOpaque(64))),
            ],
        ),
        StructDef::new("BumpSequenceOp", vec![f("bumpTo", TypeSpec::Hyper)]),
    ]
}

fn unions() -> Vec<UnionDef> {
    let env = || Discriminant::Enum("EnvelopeType".to_string());
    vec![
        UnionDef::new(
            ENVELOPE,
            "type",
            env(),
            vec![
                arm("ENVELOPE_TYPE_TX_V0", "v0", st("TransactionV0Envelope")),
                arm("ENVELOPE_TYPE_TX", "v1", st("TransactionV1Envelope")),
                arm(
                    "ENVELOPE_TYPE_TX_FEE_BUMP",
                    "feeBump",
                    st("FeeBumpTransactionEnvelope"),
                ),
            ],
        )
        .inline(),
        UnionDef::new(
            "FeeBumpInnerTx",
            "type",
            env(),
            vec![arm("ENVELOPE_TYPE_TX", "v1", st("TransactionV1Envelope"))],
        ),
        UnionDef::new(
            "Memo",
            "type",
            Discriminant::Enum("MemoType".to_string()),
            vec![
                void_arm("MEMO_NONE"),
                arm("MEMO_TEXT", "text", TypeSpec::String(28)),
                arm("MEMO_ID", "id", TypeSpec::UHyper),
                arm("MEMO_HASH", "hash", TypeSpec::FixedOpaque(32)),
                arm("MEMO_RETURN", "retHash", TypeSpec::FixedOpaque(32)),
            ],
        ),
        UnionDef::new(
            "AllowTrustAsset",
            "type",
            Discriminant::Enum("AssetType".to_string()),
            vec![
                arm(
                    "ASSET_TYPE_CREDIT_ALPHANUM4",
                    "assetCode4",
                    TypeSpec::AssetCode(4),
                ),
                arm(
                    "ASSET_TYPE_CREDIT_ALPHANUM12",
                    "assetCode12",
                    TypeSpec::AssetCode(12),
                ),
            ],
        ),
        UnionDef::new(
            "OperationBody",
            "type",
            Discriminant::Enum("OperationType".to_string()),
            vec![
                arm("CREATE_ACCOUNT", "createAccountOp", st("CreateAccountOp")),
                arm("PAYMENT", "paymentOp", st("PaymentOp")),
                arm(
                    "PATH_PAYMENT_STRICT_RECEIVE",
                    "pathPaymentStrictReceiveOp",
                    st("PathPaymentStrictReceiveOp"),
                ),
                arm("MANAGE_SELL_OFFER", "manageSellOfferOp", st("ManageSellOfferOp")),
                arm(
                    "CREATE_PASSIVE_SELL_OFFER",
                    "createPassiveSellOfferOp",
                    st("CreatePassiveSellOfferOp"),
                ),
                arm("SET_OPTIONS", "setOptionsOp", st("SetOptionsOp")),
                arm("CHANGE_TRUST", "changeTrustOp", st("ChangeTrustOp")),
                arm("ALLOW_TRUST", "allowTrustOp", st("AllowTrustOp")),
                arm("ACCOUNT_MERGE", "destination", TypeSpec::AccountId),
                void_arm("INFLATION"),
                arm("MANAGE_DATA", "manageDataOp", st("ManageDataOp")),
                arm("BUMP_SEQUENCE", "bumpSequenceOp", st("BumpSequenceOp")),
                arm("MANAGE_BUY_OFFER", "manageBuyOfferOp", st("ManageBuyOfferOp")),
                arm(
                    "PATH_PAYMENT_STRICT_SEND",
                    "pathPaymentStrictSendOp",
                    st("PathPaymentStrictSendOp"),
                ),
            ],
        ),
        empty_ext("TransactionV0Ext"),
        empty_ext("TransactionExt"),
        empty_ext("FeeBumpTransactionExt"),
    ]
}

/// All type definitions reachable from [`ENVELOPE`].
pub fn definitions() -> Definitions {
    Definitions {
        enums: enums(),
        structs: structs(),
        unions: unions(),
    }
}

pub fn schema() -> Result<Schema, SchemaError> {
    Schema::resolve(definitions())
}

/// Codec for transaction envelopes.
pub fn codec() -> Result<Codec, SchemaError> {
    Ok(Codec::new(schema()?))
}

pub fn envelope_spec() -> TypeSpec {
    TypeSpec::union_ref(ENVELOPE)
}
