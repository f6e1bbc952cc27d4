//! Flat CSV export of the whole ledger: prestations first, then depenses.

use crate::error::Result;
use crate::schema::{ClientIdentity, LedgerDocument};
use chrono::{NaiveDate, SecondsFormat};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::debug;
use std::io::Write;

pub const EXPORT_HEADER: [&str; 11] = [
    "type",
    "date",
    "categorie",
    "montant",
    "nom",
    "prenom",
    "adresse",
    "email",
    "telephone",
    "commentaire",
    "variable",
];

pub fn export_csv<W: Write>(document: &LedgerDocument, writer: W) -> Result<()> {
    let mut wrt = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    wrt.write_record(EXPORT_HEADER)?;

    let anonymous = ClientIdentity::default();
    for p in &document.prestations {
        let client = p.client.as_ref().unwrap_or(&anonymous);
        let date = p.date.to_rfc3339_opts(SecondsFormat::Millis, true);
        let amount = p.amount.to_string();
        wrt.write_record([
            "prestation",
            date.as_str(),
            p.category.as_str(),
            amount.as_str(),
            client.last_name.as_str(),
            client.first_name.as_str(),
            client.address.as_str(),
            client.email.as_str(),
            client.phone.as_str(),
            p.note.as_deref().unwrap_or(""),
            "",
        ])?;
    }

    for d in &document.depenses {
        let date = d.date.to_rfc3339_opts(SecondsFormat::Millis, true);
        let amount = d.amount.to_string();
        wrt.write_record([
            "depense",
            date.as_str(),
            d.category.as_str(),
            amount.as_str(),
            "",
            "",
            "",
            "",
            "",
            d.note.as_deref().unwrap_or(""),
            if d.variable { "oui" } else { "non" },
        ])?;
    }

    wrt.flush()?;
    debug!(
        "Exported {} prestations and {} depenses",
        document.prestations.len(),
        document.depenses.len()
    );
    Ok(())
}

pub fn export_csv_string(document: &LedgerDocument) -> Result<String> {
    let mut buffer = Vec::new();
    export_csv(document, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("salon-ledger_export_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Depense, ExpenseCategory, Prestation, ServiceCategory};
    use chrono::{TimeZone, Utc};

    fn document() -> LedgerDocument {
        LedgerDocument {
            prestations: vec![Prestation {
                id: "p1".to_string(),
                date: Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap(),
                category: ServiceCategory::Removal,
                amount: 25.5,
                client: Some(ClientIdentity {
                    last_name: "Durand".to_string(),
                    first_name: "Lea".to_string(),
                    address: "3 rue \"Haute\"".to_string(),
                    email: String::new(),
                    phone: "0600000000".to_string(),
                }),
                note: None,
            }],
            depenses: vec![Depense {
                id: "d1".to_string(),
                date: Utc.with_ymd_and_hms(2024, 1, 6, 8, 0, 0).unwrap(),
                category: ExpenseCategory::Rent,
                amount: 600.0,
                note: Some("janvier".to_string()),
                variable: false,
            }],
        }
    }

    #[test]
    fn test_every_field_is_quoted() {
        let csv = export_csv_string(&document()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "\"type\",\"date\",\"categorie\",\"montant\",\"nom\",\"prenom\",\"adresse\",\"email\",\"telephone\",\"commentaire\",\"variable\""
        );
        assert_eq!(
            lines[1],
            "\"prestation\",\"2024-01-05T10:00:00.000Z\",\"Déposes\",\"25.5\",\"Durand\",\"Lea\",\"3 rue \"\"Haute\"\"\",\"\",\"0600000000\",\"\",\"\""
        );
        assert_eq!(
            lines[2],
            "\"depense\",\"2024-01-06T08:00:00.000Z\",\"loyer\",\"600\",\"\",\"\",\"\",\"\",\"\",\"janvier\",\"non\""
        );
    }

    #[test]
    fn test_empty_ledger_exports_header_only() {
        let csv = export_csv_string(&LedgerDocument::default()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_filename(date), "salon-ledger_export_2024-03-09.csv");
    }
}
