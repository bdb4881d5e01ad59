use ascii_table::{Align, AsciiTable};

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>, empty_message: &str) {
    if rows.is_empty() {
        tracing::info!("{empty_message}");

        return;
    }

    let mut ascii_table = AsciiTable::default();

    for (index, header) in headers.iter().enumerate() {
        ascii_table
            .column(index)
            .set_header(*header)
            .set_align(Align::Left);
    }

    ascii_table.print(rows);
}
