//! SchemaRegistry: the fixed column table every other component consults.

use crate::domain::model::ColumnSpec;
use std::ops::RangeInclusive;

/// Read-only description of the single dataset table.
///
/// Column order is significant: it is the order records are serialized in and
/// the order validation rules walk the columns.
#[derive(Debug)]
pub struct SchemaRegistry {
    table_name: &'static str,
    primary_key_field: &'static str,
    columns: &'static [ColumnSpec],
    years: RangeInclusive<u16>,
}

static TOURISM_ARRIVALS_COLUMNS: [ColumnSpec; 35] = [
    ColumnSpec::text("Country_Name", false),
    ColumnSpec::text("Region", false),
    ColumnSpec::text("IncomeGroup", false),
    ColumnSpec::text("Country_Code", false),
    ColumnSpec::text("Indicator_Name", false),
    ColumnSpec::int("year_1995"),
    ColumnSpec::int("year_1996"),
    ColumnSpec::int("year_1997"),
    ColumnSpec::int("year_1998"),
    ColumnSpec::int("year_1999"),
    ColumnSpec::int("year_2000"),
    ColumnSpec::int("year_2001"),
    ColumnSpec::int("year_2002"),
    ColumnSpec::int("year_2003"),
    ColumnSpec::int("year_2004"),
    ColumnSpec::int("year_2005"),
    ColumnSpec::int("year_2006"),
    ColumnSpec::int("year_2007"),
    ColumnSpec::int("year_2008"),
    ColumnSpec::int("year_2009"),
    ColumnSpec::int("year_2010"),
    ColumnSpec::int("year_2011"),
    ColumnSpec::int("year_2012"),
    ColumnSpec::int("year_2013"),
    ColumnSpec::int("year_2014"),
    ColumnSpec::int("year_2015"),
    ColumnSpec::int("year_2016"),
    ColumnSpec::int("year_2017"),
    ColumnSpec::int("year_2018"),
    ColumnSpec::int("year_2019"),
    ColumnSpec::int("year_2020"),
    ColumnSpec::text("Average_10year_in_tourist_arrivals", true),
    ColumnSpec::int("Max_number_of_arrivals"),
    ColumnSpec::int("Minimum_number_of_arrivals"),
    ColumnSpec::text("Percent_drop_2019_to_2020", true),
];

/// The per-country yearly tourist-arrivals table.
pub static TOURISM_ARRIVALS: SchemaRegistry = SchemaRegistry {
    table_name: "tourism_arrivals",
    primary_key_field: "Country_Name",
    columns: &TOURISM_ARRIVALS_COLUMNS,
    years: 1995..=2020,
};

/// Column holding the stored 10-year average, used for ranking.
pub const AVERAGE_COLUMN: &str = "Average_10year_in_tourist_arrivals";

impl SchemaRegistry {
    pub fn table_name(&self) -> &'static str {
        self.table_name
    }

    pub fn primary_key_field(&self) -> &'static str {
        self.primary_key_field
    }

    /// All columns, in schema order.
    pub fn columns(&self) -> &'static [ColumnSpec] {
        self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> {
        self.columns.iter().map(|c| c.name)
    }

    pub fn column(&self, name: &str) -> Option<&'static ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// The non-nullable identity columns.
    pub fn non_nullable_columns(&self) -> impl Iterator<Item = &'static ColumnSpec> {
        self.columns.iter().filter(|c| !c.nullable)
    }

    /// Resolves a raw year path segment (e.g. `"1995"`) to its year column.
    ///
    /// Only four ASCII digits inside the populated range resolve.
    pub fn year_column(&self, raw: &str) -> Option<&'static ColumnSpec> {
        if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year: u16 = raw.parse().ok()?;
        if !self.years.contains(&year) {
            return None;
        }
        self.column(&format!("year_{}", year))
    }

    /// CREATE TABLE statement derived from the column table.
    pub fn create_table_sql(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let mut def = format!("\"{}\" {}", c.name, c.col_type.sql_type());
                if c.name == self.primary_key_field {
                    def.push_str(" PRIMARY KEY");
                }
                if !c.nullable {
                    def.push_str(" NOT NULL");
                }
                def
            })
            .collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.table_name,
            columns.join(",\n    ")
        )
    }
}
