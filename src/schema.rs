use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Reads a stored amount, taking `null` (a `NaN` written by a browser) as zero.
fn amount_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Services sold by the salon. Serialized as the label shown in the booking form.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
pub enum ServiceCategory {
    #[default]
    #[serde(rename = "Extensions de cils : Pose cil à cil")]
    #[schemars(description = "Classic one-to-one lash extension set")]
    ClassicSet,

    #[serde(rename = "Extensions de cils : poses légères")]
    #[schemars(description = "Light lash extension set")]
    LightSet,

    #[serde(rename = "Extensions de cils : pose volume russe")]
    #[schemars(description = "Russian volume lash extension set")]
    RussianVolume,

    #[serde(rename = "Extensions de cils : Pose Liner & Fox eyes")]
    #[schemars(description = "Liner and fox-eye styled set")]
    LinerFoxEyes,

    #[serde(rename = "Extensions de cils : pose signature Esma beauty")]
    #[schemars(description = "House signature set")]
    SignatureSet,

    #[serde(rename = "Suppléments aux extensions de cils")]
    #[schemars(description = "Add-ons sold on top of an extension set")]
    Supplements,

    #[serde(rename = "Déposes")]
    #[schemars(description = "Removal of existing extensions")]
    Removal,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 7] = [
        ServiceCategory::ClassicSet,
        ServiceCategory::LightSet,
        ServiceCategory::RussianVolume,
        ServiceCategory::LinerFoxEyes,
        ServiceCategory::SignatureSet,
        ServiceCategory::Supplements,
        ServiceCategory::Removal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::ClassicSet => "Extensions de cils : Pose cil à cil",
            ServiceCategory::LightSet => "Extensions de cils : poses légères",
            ServiceCategory::RussianVolume => "Extensions de cils : pose volume russe",
            ServiceCategory::LinerFoxEyes => "Extensions de cils : Pose Liner & Fox eyes",
            ServiceCategory::SignatureSet => "Extensions de cils : pose signature Esma beauty",
            ServiceCategory::Supplements => "Suppléments aux extensions de cils",
            ServiceCategory::Removal => "Déposes",
        }
    }
}

/// Expense headings. Serialized as the label shown in the expense form.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
pub enum ExpenseCategory {
    #[default]
    #[serde(rename = "loyer")]
    Rent,
    #[serde(rename = "facture electricité")]
    Electricity,
    #[serde(rename = "facture internet")]
    Internet,
    #[serde(rename = "telephone")]
    Phone,
    #[serde(rename = "fournisseur cil")]
    LashSupplier,
    #[serde(rename = "materiel")]
    Equipment,
    #[serde(rename = "logiciel planity")]
    BookingSoftware,
    #[serde(rename = "canva pro")]
    CanvaPro,
    #[serde(rename = "capcut pro")]
    CapcutPro,
    #[serde(rename = "chatgpt")]
    ChatGpt,
    #[serde(rename = "icloud stockage")]
    CloudStorage,
    #[serde(rename = "meta ads")]
    MetaAds,
    #[serde(rename = "meta verified")]
    MetaVerified,
    #[serde(rename = "autres")]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 14] = [
        ExpenseCategory::Rent,
        ExpenseCategory::Electricity,
        ExpenseCategory::Internet,
        ExpenseCategory::Phone,
        ExpenseCategory::LashSupplier,
        ExpenseCategory::Equipment,
        ExpenseCategory::BookingSoftware,
        ExpenseCategory::CanvaPro,
        ExpenseCategory::CapcutPro,
        ExpenseCategory::ChatGpt,
        ExpenseCategory::CloudStorage,
        ExpenseCategory::MetaAds,
        ExpenseCategory::MetaVerified,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Rent => "loyer",
            ExpenseCategory::Electricity => "facture electricité",
            ExpenseCategory::Internet => "facture internet",
            ExpenseCategory::Phone => "telephone",
            ExpenseCategory::LashSupplier => "fournisseur cil",
            ExpenseCategory::Equipment => "materiel",
            ExpenseCategory::BookingSoftware => "logiciel planity",
            ExpenseCategory::CanvaPro => "canva pro",
            ExpenseCategory::CapcutPro => "capcut pro",
            ExpenseCategory::ChatGpt => "chatgpt",
            ExpenseCategory::CloudStorage => "icloud stockage",
            ExpenseCategory::MetaAds => "meta ads",
            ExpenseCategory::MetaVerified => "meta verified",
            ExpenseCategory::Other => "autres",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ClientIdentity {
    #[serde(rename = "nom", default)]
    pub last_name: String,

    #[serde(rename = "prenom", default)]
    pub first_name: String,

    #[serde(rename = "adresse", default)]
    pub address: String,

    #[serde(default)]
    pub email: String,

    #[serde(rename = "telephone", default)]
    pub phone: String,
}

impl ClientIdentity {
    /// Grouping key used by the recurrence statistic: `email|phone|last|first`.
    ///
    /// Clients recorded without any of these four fields all share the key `|||`.
    pub fn identity_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.email, self.phone, self.last_name, self.first_name
        )
    }

    pub fn is_blank(&self) -> bool {
        [
            &self.last_name,
            &self.first_name,
            &self.address,
            &self.email,
            &self.phone,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

/// A revenue-generating service record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Prestation {
    pub id: String,

    #[schemars(description = "Instant of the service, ISO-8601 UTC")]
    pub date: DateTime<Utc>,

    #[serde(rename = "categorie")]
    pub category: ServiceCategory,

    #[serde(rename = "montant", default, deserialize_with = "amount_or_zero")]
    #[schemars(with = "Option<f64>")]
    pub amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientIdentity>,

    #[serde(rename = "commentaire", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Prestation {
    pub fn client_key(&self) -> String {
        match &self.client {
            Some(client) => client.identity_key(),
            None => ClientIdentity::default().identity_key(),
        }
    }
}

/// An expense record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Depense {
    pub id: String,

    #[schemars(description = "Instant of the expense, ISO-8601 UTC")]
    pub date: DateTime<Utc>,

    #[serde(rename = "categorie")]
    pub category: ExpenseCategory,

    #[serde(rename = "montant", default, deserialize_with = "amount_or_zero")]
    #[schemars(with = "Option<f64>")]
    pub amount: f64,

    #[serde(rename = "commentaire", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(default)]
    #[schemars(description = "Whether the expense is deducted from revenue when computing the net margin")]
    pub variable: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    #[default]
    Month,
    Year,
}

/// Inclusive `[start, end]` window with a display label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
}

impl TimeWindow {
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant <= self.end
    }
}

/// The persisted collection, newest record first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct LedgerDocument {
    #[serde(default)]
    pub prestations: Vec<Prestation>,

    #[serde(default)]
    pub depenses: Vec<Depense>,
}

impl LedgerDocument {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(LedgerDocument)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_schema_generation() {
        let schema_json = LedgerDocument::schema_as_json().unwrap();
        assert!(schema_json.contains("prestations"));
        assert!(schema_json.contains("depenses"));
        assert!(schema_json.contains("montant"));
    }

    #[test]
    fn test_deserialize_browser_document() {
        let raw = r#"{
            "prestations": [{
                "id": "a1",
                "date": "2024-01-05T10:30:00.000Z",
                "client": {"nom": "Durand", "prenom": "Lea", "adresse": "", "email": "lea@example.com", "telephone": ""},
                "categorie": "Déposes",
                "montant": 25.5,
                "commentaire": ""
            }],
            "depenses": [{
                "id": "b1",
                "date": "2024-01-06T08:00:00.000Z",
                "categorie": "fournisseur cil",
                "montant": 40,
                "variable": true
            }]
        }"#;

        let doc: LedgerDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.prestations.len(), 1);
        assert_eq!(doc.prestations[0].category, ServiceCategory::Removal);
        assert_eq!(
            doc.prestations[0].date,
            Utc.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap()
        );
        assert_eq!(
            doc.prestations[0].client_key(),
            "lea@example.com||Durand|Lea"
        );
        assert_eq!(doc.depenses[0].category, ExpenseCategory::LashSupplier);
        assert!(doc.depenses[0].variable);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let raw = r#"{"depenses": [{"id": "x", "date": "2024-03-01T00:00:00Z", "categorie": "loyer"}]}"#;
        let doc: LedgerDocument = serde_json::from_str(raw).unwrap();
        assert!(doc.prestations.is_empty());
        assert_eq!(doc.depenses[0].amount, 0.0);
        assert!(!doc.depenses[0].variable);
    }

    #[test]
    fn test_null_amount_reads_as_zero() {
        let raw = r#"{
            "prestations": [
                {"id": "a", "date": "2024-03-01T10:00:00Z", "categorie": "Déposes", "montant": null},
                {"id": "b", "date": "2024-03-02T10:00:00Z", "categorie": "Déposes", "montant": 30}
            ],
            "depenses": [
                {"id": "c", "date": "2024-03-03T10:00:00Z", "categorie": "loyer", "montant": null}
            ]
        }"#;
        let doc: LedgerDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.prestations.len(), 2);
        assert_eq!(doc.prestations[0].amount, 0.0);
        assert_eq!(doc.prestations[1].amount, 30.0);
        assert_eq!(doc.depenses[0].amount, 0.0);
    }

    #[test]
    fn test_category_labels_match_serialized_form() {
        for category in ServiceCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
        for category in ExpenseCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_enum_defaults() {
        assert_eq!(ServiceCategory::default(), ServiceCategory::ClassicSet);
        assert_eq!(ExpenseCategory::default(), ExpenseCategory::Rent);
        assert_eq!(Granularity::default(), Granularity::Month);
    }

    #[test]
    fn test_anonymous_clients_share_a_key() {
        let anonymous = ClientIdentity::default();
        assert_eq!(anonymous.identity_key(), "|||");
        assert!(anonymous.is_blank());
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let window = TimeWindow {
            start,
            end,
            label: "janvier 2024".to_string(),
        };
        assert!(window.contains(&start));
        assert!(window.contains(&end));
        assert!(!window.contains(&(end + chrono::Duration::seconds(1))));
    }
}
