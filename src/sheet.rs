use crate::ResolvedCompound;
use anyhow::{anyhow, Result};
use std::path::Path;
use tracing::*;
use umya_spreadsheet::{reader, writer, VerticalAlignmentValues, Worksheet};

/// Workbook the tool appends to when no path is given on the command line.
pub const DEFAULT_SHEET_PATH: &str = "compounds.xlsx";

const NAME_COLUMN: u32 = 1;
const SMILES_COLUMN: u32 = 2;
const NOTES_COLUMN: u32 = 3;

const SMILES_COLUMN_WIDTH: f64 = 50.0;
const SMILES_FONT_SIZE: f64 = 8.0;

/// Appends the resolved compounds to the workbook at `path` and saves it
/// back in place. Rows land at the first fully empty row (columns A and B
/// both blank); the SMILES cells get a small no-wrap font so long structure
/// strings stay readable.
pub fn append_results(path: &Path, compounds: &[ResolvedCompound]) -> Result<()> {
    let mut book = reader::xlsx::read(path)
        .map_err(|e| anyhow!("Could not open workbook {}: {:?}", path.display(), e))?;
    let sheet = book
        .get_sheet_mut(&0)
        .ok_or_else(|| anyhow!("Workbook {} has no sheets", path.display()))?;

    append_to_sheet(sheet, compounds);

    writer::xlsx::write(&book, path)
        .map_err(|e| anyhow!("Could not save workbook {}: {:?}", path.display(), e))?;
    info!("Appended {} compounds to {}", compounds.len(), path.display());
    Ok(())
}

fn append_to_sheet(sheet: &mut Worksheet, compounds: &[ResolvedCompound]) {
    let start = first_empty_row(sheet);
    sheet
        .get_column_dimension_mut("B")
        .set_width(SMILES_COLUMN_WIDTH);

    for (i, compound) in compounds.iter().enumerate() {
        let row = start + i as u32;
        sheet
            .get_cell_mut((NAME_COLUMN, row))
            .set_value(compound.name.clone());
        sheet
            .get_cell_mut((SMILES_COLUMN, row))
            .set_value(compound.smiles.clone());

        let style = sheet.get_style_mut((SMILES_COLUMN, row));
        style.get_font_mut().set_size(SMILES_FONT_SIZE);
        let alignment = style.get_alignment_mut();
        alignment.set_wrap_text(false);
        alignment.set_vertical(VerticalAlignmentValues::Center);

        // The notes column is reserved; make sure stale content does not
        // line up against the new rows.
        sheet.get_cell_mut((NOTES_COLUMN, row)).set_value("");
    }
}

/// Finds the insertion point: the first row where both the name and SMILES
/// cells are blank, or one past the last used row.
fn first_empty_row(sheet: &Worksheet) -> u32 {
    let highest = sheet.get_highest_row();
    for row in 1..=highest {
        if sheet.get_value((NAME_COLUMN, row)).is_empty()
            && sheet.get_value((SMILES_COLUMN, row)).is_empty()
        {
            return row;
        }
    }
    highest + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use umya_spreadsheet::new_file;

    fn compound(name: &str, smiles: &str) -> ResolvedCompound {
        ResolvedCompound {
            name: name.to_string(),
            smiles: smiles.to_string(),
        }
    }

    #[test]
    fn empty_sheet_starts_at_row_one() {
        let book = new_file();
        let sheet = book.get_sheet(&0).unwrap();
        assert_eq!(first_empty_row(sheet), 1);
    }

    #[test]
    fn gap_in_the_middle_wins_over_the_end() {
        let mut book = new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.get_cell_mut((1, 1)).set_value("water");
        sheet.get_cell_mut((2, 1)).set_value("O");
        // row 2 left blank
        sheet.get_cell_mut((1, 3)).set_value("ethanol");
        sheet.get_cell_mut((2, 3)).set_value("CCO");
        assert_eq!(first_empty_row(sheet), 2);
    }

    #[test]
    fn row_counts_as_used_when_either_cell_is_filled() {
        let mut book = new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.get_cell_mut((1, 1)).set_value("name only");
        sheet.get_cell_mut((2, 2)).set_value("smiles only");
        assert_eq!(first_empty_row(sheet), 3);
    }

    #[test]
    fn appends_after_existing_rows() {
        let mut book = new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.get_cell_mut((1, 1)).set_value("water");
        sheet.get_cell_mut((2, 1)).set_value("O");

        append_to_sheet(
            sheet,
            &[
                compound("aspirin", "CC(=O)OC1=CC=CC=C1C(=O)O"),
                compound("L-alanine", "C[C@@H](N)C(=O)O"),
            ],
        );

        assert_eq!(sheet.get_value((1, 2)), "aspirin");
        assert_eq!(sheet.get_value((2, 2)), "CC(=O)OC1=CC=CC=C1C(=O)O");
        assert_eq!(sheet.get_value((1, 3)), "L-alanine");
        assert_eq!(sheet.get_value((2, 3)), "C[C@@H](N)C(=O)O");
        // The earlier row is untouched.
        assert_eq!(sheet.get_value((1, 1)), "water");
    }

    #[test]
    fn round_trips_through_a_saved_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compounds.xlsx");

        let mut book = new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.get_cell_mut((1, 1)).set_value("water");
        sheet.get_cell_mut((2, 1)).set_value("O");
        writer::xlsx::write(&book, &path).unwrap();

        append_results(&path, &[compound("caffeine", "CN1C=NC2=C1C(=O)N(C(=O)N2C)C")])
            .unwrap();

        let reread = reader::xlsx::read(&path).unwrap();
        let sheet = reread.get_sheet(&0).unwrap();
        assert_eq!(sheet.get_value((1, 2)), "caffeine");
        assert_eq!(sheet.get_value((2, 2)), "CN1C=NC2=C1C(=O)N(C(=O)N2C)C");
    }

    #[test]
    fn missing_workbook_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.xlsx");
        assert!(append_results(&path, &[compound("water", "O")]).is_err());
    }
}
