use std::collections::BTreeMap;
use unionfees_core::error::UnionFeesError;
use unionfees_core::model::Section;

pub fn print(sections: &BTreeMap<String, Section>) -> Result<(), UnionFeesError> {
    let json = serde_json::to_string_pretty(&sections.values().collect::<Vec<_>>())?;
    println!("{json}");
    Ok(())
}
