// core/export_service.rs
use crate::models::{Prediction, UserProfile};
use crate::utils::error::{AppError, Result};
use chrono::Utc;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use rust_xlsxwriter::{Format, Workbook};

/// Nombre maximal de blocs détaillés dans le rapport PDF
const PDF_DETAIL_LIMIT: usize = 10;

// Page au format lettre US
const PAGE_WIDTH_MM: f64 = 215.9;
const PAGE_HEIGHT_MM: f64 = 279.4;
const MARGIN_MM: f64 = 15.0;

/// Génération des rapports téléchargeables (PDF et Excel)
pub struct ExportService;

/// Agrégats communs aux deux formats de rapport
struct SummaryStats {
    total: usize,
    approved: usize,
    rejected: usize,
    approval_rate: f64,
    avg_amount: f64,
    avg_cibil: f64,
}

impl SummaryStats {
    fn from(predictions: &[Prediction]) -> Self {
        let total = predictions.len();
        let approved = predictions.iter().filter(|p| p.is_approved()).count();
        let avg_amount = predictions.iter().map(|p| p.loan_amount).sum::<f64>() / total as f64;
        let avg_cibil =
            predictions.iter().map(|p| p.cibil_score as f64).sum::<f64>() / total as f64;

        Self {
            total,
            approved,
            rejected: total - approved,
            approval_rate: approved as f64 / total as f64 * 100.0,
            avg_amount,
            avg_cibil,
        }
    }
}

/// Curseur d'écriture du PDF : descend la page et en ouvre une nouvelle
/// quand la marge basse est atteinte
struct PdfWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f64,
}

impl<'a> PdfWriter<'a> {
    fn new(doc: &'a PdfDocumentReference, layer: PdfLayerReference) -> Self {
        Self {
            doc,
            layer,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        }
    }

    fn write_line(&mut self, text: &str, size: f64, font: &IndirectFontRef) {
        // Interligne proportionnel à la taille de police (points -> mm)
        let leading = size * 0.55;

        if self.y - leading < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM as f32), Mm(PAGE_HEIGHT_MM as f32), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }

        self.y -= leading;
        self.layer
            .use_text(text, size as f32, Mm(MARGIN_MM as f32), Mm(self.y as f32), font);
    }

    fn blank(&mut self, mm: f64) {
        self.y -= mm;
    }
}

/// Montant en roupies pour le PDF. Les polices intégrées sont encodées en
/// WinAnsi : pas de glyphe roupie, on écrit "Rs." à la place.
fn pdf_amount(amount: f64) -> String {
    crate::core::insight_service::format_inr(amount).replacen('₹', "Rs. ", 1)
}

impl ExportService {
    /// Nom du fichier PDF téléchargé
    pub fn pdf_filename(username: &str) -> String {
        format!(
            "loan_predictions_{}_{}.pdf",
            username,
            Utc::now().format("%Y%m%d")
        )
    }

    /// Nom du fichier Excel téléchargé
    pub fn excel_filename(username: &str) -> String {
        format!(
            "loan_predictions_{}_{}.xlsx",
            username,
            Utc::now().format("%Y%m%d")
        )
    }

    /// Rapport PDF : titre, synthèse, détail des dernières prédictions
    pub fn export_pdf(user: &UserProfile, predictions: &[Prediction]) -> Result<Vec<u8>> {
        if predictions.is_empty() {
            return Err(AppError::NothingToExport);
        }

        let (doc, page, layer) = PdfDocument::new(
            "Loan Prediction Report",
            Mm(PAGE_WIDTH_MM as f32),
            Mm(PAGE_HEIGHT_MM as f32),
            "Layer 1",
        );

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::ExportError(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::ExportError(e.to_string()))?;

        let first_layer = doc.get_page(page).get_layer(layer);
        let mut writer = PdfWriter::new(&doc, first_layer);

        // Titre
        writer.write_line("Loan Prediction Report", 24.0, &bold);
        writer.blank(4.0);

        // Informations utilisateur
        writer.write_line(
            &format!("Generated for: {} ({})", user.username, user.email),
            11.0,
            &font,
        );
        writer.write_line(
            &format!("Date: {}", Utc::now().format("%B %d, %Y at %I:%M %p")),
            11.0,
            &font,
        );
        writer.write_line(
            &format!("Total Predictions: {}", predictions.len()),
            11.0,
            &font,
        );
        writer.blank(6.0);

        // Synthèse
        let stats = SummaryStats::from(predictions);
        writer.write_line("Summary Statistics", 16.0, &bold);
        writer.write_line(&format!("Total Applications: {}", stats.total), 11.0, &font);
        writer.write_line(&format!("Approved: {}", stats.approved), 11.0, &font);
        writer.write_line(&format!("Rejected: {}", stats.rejected), 11.0, &font);
        writer.write_line(
            &format!("Approval Rate: {:.1}%", stats.approval_rate),
            11.0,
            &font,
        );
        writer.write_line(
            &format!("Average Loan Amount: {}", pdf_amount(stats.avg_amount)),
            11.0,
            &font,
        );
        writer.write_line(
            &format!("Average CIBIL Score: {:.0}", stats.avg_cibil),
            11.0,
            &font,
        );
        writer.blank(6.0);

        // Détail des prédictions les plus récentes
        writer.write_line("Prediction Details", 16.0, &bold);

        for prediction in predictions.iter().take(PDF_DETAIL_LIMIT) {
            writer.blank(3.0);
            writer.write_line(
                &format!("Date: {}", prediction.created_at.format("%Y-%m-%d %H:%M")),
                11.0,
                &bold,
            );
            writer.write_line(
                &format!("Loan Amount: {}", pdf_amount(prediction.loan_amount)),
                11.0,
                &font,
            );
            writer.write_line(
                &format!("Income: {}", pdf_amount(prediction.income_annum)),
                11.0,
                &font,
            );
            writer.write_line(
                &format!("CIBIL Score: {}", prediction.cibil_score),
                11.0,
                &font,
            );
            writer.write_line(&format!("Result: {}", prediction.outcome), 11.0, &font);
            writer.write_line(
                &format!("Probability: {}%", prediction.probability),
                11.0,
                &font,
            );
        }

        // Pied de page
        writer.blank(8.0);
        writer.write_line(
            "This report is generated automatically by the Loan Prediction System.",
            9.0,
            &font,
        );
        writer.write_line("For queries, contact your administrator.", 9.0, &font);

        doc.save_to_bytes()
            .map_err(|e| AppError::ExportError(e.to_string()))
    }

    /// Rapport Excel : feuille détaillée + feuille de synthèse
    pub fn export_excel(user: &UserProfile, predictions: &[Prediction]) -> Result<Vec<u8>> {
        if predictions.is_empty() {
            return Err(AppError::NothingToExport);
        }

        let stats = SummaryStats::from(predictions);
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        // Feuille des prédictions
        {
            let sheet = workbook.add_worksheet();
            sheet
                .set_name("Predictions")
                .map_err(|e| AppError::ExportError(e.to_string()))?;

            let columns = [
                "Date",
                "Loan Amount",
                "Income",
                "CIBIL Score",
                "Education",
                "Self Employed",
                "Dependents",
                "Loan Term",
                "Residential Assets",
                "Commercial Assets",
                "Luxury Assets",
                "Bank Assets",
                "Result",
                "Probability",
            ];

            for (col, name) in columns.iter().enumerate() {
                sheet
                    .write_string_with_format(0, col as u16, *name, &header)
                    .map_err(|e| AppError::ExportError(e.to_string()))?;
            }

            for (i, p) in predictions.iter().enumerate() {
                let row = (i + 1) as u32;
                let write = |e: rust_xlsxwriter::XlsxError| AppError::ExportError(e.to_string());

                sheet
                    .write_string(row, 0, p.created_at.format("%Y-%m-%d %H:%M").to_string())
                    .map_err(write)?;
                sheet.write_number(row, 1, p.loan_amount).map_err(write)?;
                sheet.write_number(row, 2, p.income_annum).map_err(write)?;
                sheet
                    .write_number(row, 3, p.cibil_score as f64)
                    .map_err(write)?;
                sheet.write_string(row, 4, &p.education).map_err(write)?;
                sheet.write_string(row, 5, &p.self_employed).map_err(write)?;
                sheet
                    .write_number(row, 6, p.no_of_dependents as f64)
                    .map_err(write)?;
                sheet
                    .write_number(row, 7, p.loan_term as f64)
                    .map_err(write)?;
                sheet
                    .write_number(row, 8, p.residential_assets_value)
                    .map_err(write)?;
                sheet
                    .write_number(row, 9, p.commercial_assets_value)
                    .map_err(write)?;
                sheet
                    .write_number(row, 10, p.luxury_assets_value)
                    .map_err(write)?;
                sheet
                    .write_number(row, 11, p.bank_asset_value)
                    .map_err(write)?;
                sheet
                    .write_string(row, 12, p.outcome.to_string())
                    .map_err(write)?;
                sheet.write_number(row, 13, p.probability).map_err(write)?;
            }
        }

        // Feuille de synthèse
        {
            let sheet = workbook.add_worksheet();
            sheet
                .set_name("Summary")
                .map_err(|e| AppError::ExportError(e.to_string()))?;

            let rows = [
                ("Total Predictions", stats.total.to_string()),
                ("Approved", stats.approved.to_string()),
                ("Rejected", stats.rejected.to_string()),
                ("Approval Rate", format!("{:.1}%", stats.approval_rate)),
                (
                    "Avg Loan Amount",
                    crate::core::insight_service::format_inr(stats.avg_amount),
                ),
                ("Avg CIBIL Score", format!("{:.0}", stats.avg_cibil)),
            ];

            sheet
                .write_string_with_format(0, 0, "Metric", &header)
                .map_err(|e| AppError::ExportError(e.to_string()))?;
            sheet
                .write_string_with_format(0, 1, "Value", &header)
                .map_err(|e| AppError::ExportError(e.to_string()))?;

            for (i, (metric, value)) in rows.iter().enumerate() {
                let row = (i + 1) as u32;
                sheet
                    .write_string(row, 0, *metric)
                    .map_err(|e| AppError::ExportError(e.to_string()))?;
                sheet
                    .write_string(row, 1, value)
                    .map_err(|e| AppError::ExportError(e.to_string()))?;
            }
        }

        tracing::debug!(
            "Rapport Excel généré pour {} ({} lignes)",
            user.username,
            predictions.len()
        );

        workbook
            .save_to_buffer()
            .map_err(|e| AppError::ExportError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Outcome;
    use uuid::Uuid;

    fn test_user() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            email: "export@example.com".to_string(),
            username: "exporter".to_string(),
            is_verified: true,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    fn test_predictions(count: usize) -> Vec<Prediction> {
        (0..count)
            .map(|i| Prediction {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                no_of_dependents: 2,
                education: "Graduate".to_string(),
                self_employed: "No".to_string(),
                income_annum: 900_000.0,
                loan_amount: 2_000_000.0 + i as f64,
                loan_term: 12,
                cibil_score: 720,
                residential_assets_value: 1_000_000.0,
                commercial_assets_value: 0.0,
                luxury_assets_value: 0.0,
                bank_asset_value: 250_000.0,
                outcome: if i % 2 == 0 {
                    Outcome::Approved
                } else {
                    Outcome::Rejected
                },
                probability: 66.67,
                created_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn test_empty_history_is_an_error() {
        let user = test_user();
        assert!(matches!(
            ExportService::export_pdf(&user, &[]),
            Err(AppError::NothingToExport)
        ));
        assert!(matches!(
            ExportService::export_excel(&user, &[]),
            Err(AppError::NothingToExport)
        ));
    }

    #[test]
    fn test_pdf_export_produces_document() {
        let bytes = ExportService::export_pdf(&test_user(), &test_predictions(3)).unwrap();

        assert!(!bytes.is_empty());
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn test_pdf_export_handles_long_history() {
        // Plus que la limite de détail : pagination sans panique
        let bytes = ExportService::export_pdf(&test_user(), &test_predictions(25)).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_excel_export_produces_workbook() {
        let bytes = ExportService::export_excel(&test_user(), &test_predictions(4)).unwrap();

        assert!(!bytes.is_empty());
        // Un classeur xlsx est une archive zip
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_filenames_carry_username_and_date() {
        let date = Utc::now().format("%Y%m%d").to_string();

        assert_eq!(
            ExportService::pdf_filename("alice"),
            format!("loan_predictions_alice_{}.pdf", date)
        );
        assert_eq!(
            ExportService::excel_filename("alice"),
            format!("loan_predictions_alice_{}.xlsx", date)
        );
    }

    #[test]
    fn test_pdf_amount_uses_winansi_safe_prefix() {
        assert_eq!(pdf_amount(1_234_567.0), "Rs. 1,234,567");
    }
}
