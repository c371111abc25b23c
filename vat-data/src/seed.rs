//! Built-in sample of the activity classification, used when no
//! classification file is configured.

use vat_core::{ActivityClassificationEntry, ClassificationTable};

const SAMPLE: &[(&str, &str)] = &[
    ("01.11", "Выращивание зерновых культур"),
    ("01.12", "Выращивание риса"),
    ("01.13", "Выращивание овощей"),
    ("01.21", "Выращивание винограда"),
    ("01.24", "Выращивание семечковых и косточковых культур"),
    ("10.11", "Переработка и консервирование мяса"),
    ("10.12", "Переработка и консервирование мяса птицы"),
    ("10.13", "Производство продуктов из мяса"),
    ("10.20", "Переработка и консервирование рыбы"),
    ("10.31", "Переработка и консервирование картофеля"),
    ("46.11", "Деятельность агентов по оптовой торговле"),
    ("46.21", "Торговля оптовая зерном"),
    ("47.11", "Торговля розничная в неспециализированных магазинах"),
    ("47.19", "Торговля розничная прочая в неспециализированных магазинах"),
    ("47.21", "Торговля розничная фруктами и овощами"),
    ("62.01", "Разработка компьютерного программного обеспечения"),
    ("62.02", "Деятельность консультативная и работы в области компьютерных технологий"),
    ("63.11", "Деятельность по обработке данных"),
    ("68.10", "Покупка и продажа собственного недвижимого имущества"),
    ("68.20", "Аренда и управление собственным или арендованным недвижимым имуществом"),
    ("69.10", "Деятельность в области права"),
    ("69.20", "Деятельность по оказанию услуг в области бухгалтерского учета"),
    ("70.10", "Деятельность головных офисов"),
    ("70.22", "Консультирование по вопросам коммерческой деятельности и управления"),
    ("73.11", "Деятельность рекламных агентств"),
    ("85.11", "Образование дошкольное"),
    ("85.41", "Образование дополнительное детей и взрослых"),
    ("86.10", "Деятельность больничных организаций"),
    ("86.21", "Общая врачебная практика"),
    ("86.22", "Специальная врачебная практика"),
];

/// The sample classification table, in code order.
pub fn sample_classifications() -> ClassificationTable {
    SAMPLE
        .iter()
        .filter_map(|(code, name)| ActivityClassificationEntry::new(*code, *name).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use vat_core::{RateResolver, VatCategory};

    use super::*;

    #[test]
    fn sample_has_every_row() {
        assert_eq!(sample_classifications().len(), 30);
    }

    #[test]
    fn sample_suggests_expected_rates() {
        let table = sample_classifications();
        let resolver = RateResolver::default();
        let suggest = |code: &str| {
            let entry = table.find(code).expect("sample entry");
            resolver.suggest_rate(&entry.code, &entry.name)
        };

        assert_eq!(suggest("10.11"), dec!(10));
        assert_eq!(suggest("47.21"), dec!(10));
        assert_eq!(suggest("62.01"), dec!(20));
        assert_eq!(suggest("69.20"), dec!(20));
    }

    #[test]
    fn sample_search_finds_retail_rows() {
        let table = sample_classifications();

        let codes: Vec<_> = table
            .search("розничная")
            .map(|entry| entry.code.as_str())
            .collect();

        assert_eq!(codes, vec!["47.11", "47.19", "47.21"]);
    }

    #[test]
    fn sample_fish_processing_is_reduced_category() {
        let table = sample_classifications();
        let entry = table.find("10.20").unwrap();

        let category = RateResolver::default().suggest_category(&entry.code, &entry.name);

        assert_eq!(category, VatCategory::Reduced);
    }
}
