//! The IATI vocabulary declared as schema data.
//!
//! Each model states its fields once in a [`Schema`](iatibind_engine::Schema);
//! the engine derives attribute and tag names, decode strategy and encode
//! strategy from that declaration alone.

pub mod activity;
pub mod codelist;
pub mod organisation;
pub mod publisher;
pub mod result;

pub use activity::{
    ActivityDate, ActivityDateType, ActivityStatus, ActivityStatusCode, Budget, BudgetItem,
    CapitalSpend, CodedValue, Condition, Conditions, ContactInfo, ContactType, CountryBudgetItems,
    Description, DocumentCategory, DocumentLink, HumanitarianScope, IatiActivities, IatiActivity,
    IatiVersion, IsoDate, LegacyData, Location, Money, OrganisationRole, OrganisationType,
    OtherIdentifier, OtherIdentifierType, OwnerOrg, ParticipatingOrg, PlannedDisbursement, Point,
    PolicyMarker, Pos, RecipientCountry, RecipientRegion, RelatedActivity, RelatedActivityType,
    Sector, Tag, Transaction, TransactionOrg, TransactionType,
};
pub use codelist::{Codelist, CodelistItem, CodelistItems, CodelistMetadata, CodelistStatus};
pub use organisation::ReportingOrg;
pub use publisher::{IatiPublishersList, Publisher};
pub use result::{
    ActivityResult, Baseline, Dimension, Indicator, IndicatorMeasure, IndicatorPeriod,
    IndicatorReference, LocationRef, PeriodValue, ResultReference, ResultType,
};

/// Declare an enumerated code: the Rust enum, its [`CodeEnum`] table, and a
/// serde form that writes the code string.
///
/// [`CodeEnum`]: iatibind_engine::CodeEnum
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl iatibind_engine::CodeEnum for $name {
            const CODES: &'static [&'static str] = &[$($code),+];

            fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(iatibind_engine::CodeEnum::code(self))
            }
        }
    };
}

pub(crate) use code_enum;
