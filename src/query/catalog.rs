//! The fixed catalog of analytical queries.
//!
//! Labels are user-facing selector values and the SQL text is executed
//! verbatim against the `obesity` and `malnutrition` tables; both are part of
//! the external contract and must stay stable.

use std::fmt;

/// Declares a catalog enum whose variants carry a label and SQL text.
macro_rules! query_catalog {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident => ($label:literal, $sql:literal), )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            /// Every entry, in selector order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }

            pub fn sql(self) -> &'static str {
                match self {
                    $( $name::$variant => $sql, )+
                }
            }
        }
    };
}

query_catalog! {
    /// Queries over the `obesity` table.
    pub enum ObesityQuery {
        TopRegions2022 => (
            "Top 5 regions with highest obesity in 2022",
            "SELECT Region, AVG(Mean_Estimate) AS Avg_Obesity
FROM obesity
WHERE Year = 2022
GROUP BY Region
ORDER BY Avg_Obesity DESC
LIMIT 5;"
        ),
        TopCountries => (
            "Top 5 countries with highest obesity",
            "SELECT Country, MAX(Mean_Estimate) AS Max_Obesity
FROM obesity
GROUP BY Country
ORDER BY Max_Obesity DESC
LIMIT 5;"
        ),
        IndiaTrend => (
            "Obesity trend in India over the years",
            "SELECT Year, AVG(Mean_Estimate) AS Avg_Obesity
FROM obesity
WHERE Country = 'India'
GROUP BY Year
ORDER BY Year;"
        ),
        ByGender => (
            "Average obesity by gender",
            "SELECT Gender, AVG(Mean_Estimate) AS Avg_Obesity
FROM obesity
GROUP BY Gender;"
        ),
        LevelAgeCountryCount => (
            "Country count by obesity level and age group",
            "SELECT Obesity_Level, Age_Group, COUNT(DISTINCT Country) AS Country_Count
FROM obesity
GROUP BY Obesity_Level, Age_Group;"
        ),
        Reliability => (
            "Top 5 least and most reliable countries (CI_Width)",
            "SELECT Country, AVG(CI_Width) AS Avg_CI
FROM obesity
GROUP BY Country
ORDER BY Avg_CI DESC
LIMIT 5;"
        ),
        ByAgeGroup => (
            "Average obesity by age group",
            "SELECT Age_Group, AVG(Mean_Estimate) AS Avg_Obesity
FROM obesity
GROUP BY Age_Group;"
        ),
        ConsistentLow => (
            "Top 10 consistent low obesity countries",
            "SELECT Country, AVG(Mean_Estimate) AS Avg_Obesity, AVG(CI_Width) AS Avg_CI
FROM obesity
GROUP BY Country
HAVING Avg_Obesity < 25 AND Avg_CI < 3
ORDER BY Avg_Obesity
LIMIT 10;"
        ),
        FemaleExceedsMale => (
            "Countries where female obesity exceeds male",
            "SELECT f.Country, f.Year, (f.Mean_Estimate - m.Mean_Estimate) AS Gender_Gap
FROM obesity f
JOIN obesity m ON f.Country = m.Country AND f.Year = m.Year
WHERE f.Gender = 'Female' AND m.Gender = 'Male'
HAVING Gender_Gap > 5
ORDER BY Gender_Gap DESC;"
        ),
        GlobalYearly => (
            "Global average obesity percentage per year",
            "SELECT Year, AVG(Mean_Estimate) AS Global_Obesity
FROM obesity
GROUP BY Year
ORDER BY Year;"
        ),
    }
}

query_catalog! {
    /// Queries over the `malnutrition` table.
    pub enum MalnutritionQuery {
        ByAgeGroup => (
            "Avg. malnutrition by age group",
            "SELECT Age_Group, AVG(Mean_Estimate) AS Avg_Malnutrition
FROM malnutrition
GROUP BY Age_Group;"
        ),
        TopCountries => (
            "Top 5 countries with highest malnutrition",
            "SELECT Country, MAX(Mean_Estimate) AS Max_Malnutrition
FROM malnutrition
GROUP BY Country
ORDER BY Max_Malnutrition DESC
LIMIT 5;"
        ),
        AfricaTrend => (
            "Malnutrition trend in African region",
            "SELECT Year, AVG(Mean_Estimate) AS Avg_Malnutrition
FROM malnutrition
WHERE Region = 'Africa'
GROUP BY Year
ORDER BY Year;"
        ),
        ByGender => (
            "Gender-based average malnutrition",
            "SELECT Gender, AVG(Mean_Estimate) AS Avg_Malnutrition
FROM malnutrition
GROUP BY Gender;"
        ),
        LevelAgeCi => (
            "Malnutrition level-wise CI_Width by age group",
            "SELECT Malnutrition_Level, Age_Group, AVG(CI_Width) AS Avg_CI
FROM malnutrition
GROUP BY Malnutrition_Level, Age_Group;"
        ),
        NamedCountryTrend => (
            "Yearly malnutrition change (India, Nigeria, Brazil)",
            "SELECT Country, Year, AVG(Mean_Estimate) AS Avg_Malnutrition
FROM malnutrition
WHERE Country IN ('India', 'Nigeria', 'Brazil')
GROUP BY Country, Year
ORDER BY Country, Year;"
        ),
        LowestRegions => (
            "Regions with lowest malnutrition averages",
            "SELECT Region, AVG(Mean_Estimate) AS Avg_Malnutrition
FROM malnutrition
GROUP BY Region
ORDER BY Avg_Malnutrition ASC
LIMIT 5;"
        ),
        Increasing => (
            "Countries with increasing malnutrition",
            "SELECT Country, MAX(Mean_Estimate) - MIN(Mean_Estimate) AS Increase
FROM malnutrition
GROUP BY Country
HAVING Increase > 0
ORDER BY Increase DESC;"
        ),
        YearlyMinMax => (
            "Min/Max malnutrition levels year-wise",
            "SELECT Year, MIN(Mean_Estimate) AS Min_Level, MAX(Mean_Estimate) AS Max_Level
FROM malnutrition
GROUP BY Year
ORDER BY Year;"
        ),
        HighCiFlags => (
            "High CI_Width flags (CI_Width > 5)",
            "SELECT *
FROM malnutrition
WHERE CI_Width > 5
ORDER BY CI_Width DESC;"
        ),
    }
}

query_catalog! {
    /// Queries joining both tables.
    pub enum CombinedQuery {
        FiveCountries => (
            "Obesity vs malnutrition (5 countries)",
            "SELECT o.Country, o.Year, o.Mean_Estimate AS Obesity, m.Mean_Estimate AS Malnutrition
FROM obesity o
JOIN malnutrition m ON o.Country = m.Country AND o.Year = m.Year
WHERE o.Country IN ('India', 'Nigeria', 'Brazil', 'USA', 'China');"
        ),
        GenderDisparity => (
            "Gender-based disparity in both",
            "SELECT o.Gender, AVG(o.Mean_Estimate) AS Avg_Obesity, AVG(m.Mean_Estimate) AS Avg_Malnutrition
FROM obesity o
JOIN malnutrition m ON o.Gender = m.Gender AND o.Country = m.Country AND o.Year = m.Year
GROUP BY o.Gender;"
        ),
        AfricaVsAmericas => (
            "Region-wise avg estimates (Africa vs America)",
            "SELECT o.Region, AVG(o.Mean_Estimate) AS Obesity, AVG(m.Mean_Estimate) AS Malnutrition
FROM obesity o
JOIN malnutrition m ON o.Region = m.Region AND o.Country = m.Country AND o.Year = m.Year
WHERE o.Region IN ('Africa', 'Americas')
GROUP BY o.Region;"
        ),
        ObesityUpMalnutritionDown => (
            "Countries with obesity up & malnutrition down",
            "SELECT o.Country
FROM (
    SELECT Country, MAX(Mean_Estimate) - MIN(Mean_Estimate) AS Obesity_Change
    FROM obesity
    GROUP BY Country
) o
JOIN (
    SELECT Country, MIN(Mean_Estimate) - MAX(Mean_Estimate) AS Malnutrition_Change
    FROM malnutrition
    GROUP BY Country
) m ON o.Country = m.Country
WHERE o.Obesity_Change > 0 AND m.Malnutrition_Change > 0;"
        ),
        AgeWiseTrend => (
            "Age-wise trend analysis",
            "SELECT o.Year, o.Age_Group, AVG(o.Mean_Estimate) AS Avg_Obesity, AVG(m.Mean_Estimate) AS Avg_Malnutrition
FROM obesity o
JOIN malnutrition m ON o.Year = m.Year AND o.Age_Group = m.Age_Group AND o.Country = m.Country
GROUP BY o.Year, o.Age_Group;"
        ),
    }
}

// ---------------------------------------------------------------------------
// Catalog – the three selector tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Catalog {
    Obesity,
    Malnutrition,
    Combined,
}

impl Catalog {
    pub const ALL: [Catalog; 3] = [Catalog::Obesity, Catalog::Malnutrition, Catalog::Combined];

    /// Stable machine name (`obesity`, `malnutrition`, `combined`).
    pub fn name(self) -> &'static str {
        match self {
            Catalog::Obesity => "obesity",
            Catalog::Malnutrition => "malnutrition",
            Catalog::Combined => "combined",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Tab title.
    pub fn title(self) -> &'static str {
        match self {
            Catalog::Obesity => "Obesity",
            Catalog::Malnutrition => "Malnutrition",
            Catalog::Combined => "Combined Insights",
        }
    }

    /// Entries in selector order.
    pub fn queries(self) -> Vec<QueryId> {
        match self {
            Catalog::Obesity => ObesityQuery::ALL.iter().map(|&q| QueryId::Obesity(q)).collect(),
            Catalog::Malnutrition => MalnutritionQuery::ALL
                .iter()
                .map(|&q| QueryId::Malnutrition(q))
                .collect(),
            Catalog::Combined => CombinedQuery::ALL
                .iter()
                .map(|&q| QueryId::Combined(q))
                .collect(),
        }
    }

    /// First entry, the selector default.
    pub fn default_query(self) -> QueryId {
        match self {
            Catalog::Obesity => QueryId::Obesity(ObesityQuery::TopRegions2022),
            Catalog::Malnutrition => QueryId::Malnutrition(MalnutritionQuery::ByAgeGroup),
            Catalog::Combined => QueryId::Combined(CombinedQuery::FiveCountries),
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// QueryId – catalog × entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryId {
    Obesity(ObesityQuery),
    Malnutrition(MalnutritionQuery),
    Combined(CombinedQuery),
}

impl QueryId {
    /// Resolve a selector label. Only used at the presentation boundary.
    pub fn from_label(catalog: Catalog, label: &str) -> Option<Self> {
        catalog.queries().into_iter().find(|q| q.label() == label)
    }

    pub fn catalog(self) -> Catalog {
        match self {
            QueryId::Obesity(_) => Catalog::Obesity,
            QueryId::Malnutrition(_) => Catalog::Malnutrition,
            QueryId::Combined(_) => Catalog::Combined,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QueryId::Obesity(q) => q.label(),
            QueryId::Malnutrition(q) => q.label(),
            QueryId::Combined(q) => q.label(),
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            QueryId::Obesity(q) => q.sql(),
            QueryId::Malnutrition(q) => q.sql(),
            QueryId::Combined(q) => q.sql(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalog_sizes() {
        assert_eq!(Catalog::Obesity.queries().len(), 10);
        assert_eq!(Catalog::Malnutrition.queries().len(), 10);
        assert_eq!(Catalog::Combined.queries().len(), 5);
    }

    #[test]
    fn labels_unique_within_each_catalog() {
        for catalog in Catalog::ALL {
            let labels: HashSet<&str> = catalog.queries().iter().map(|q| q.label()).collect();
            assert_eq!(labels.len(), catalog.queries().len(), "{catalog}");
        }
    }

    #[test]
    fn label_round_trips_to_same_entry() {
        for catalog in Catalog::ALL {
            for q in catalog.queries() {
                assert_eq!(QueryId::from_label(catalog, q.label()), Some(q));
                assert_eq!(q.catalog(), catalog);
            }
        }
    }

    #[test]
    fn label_lookup_is_scoped_to_catalog() {
        let label = "Average obesity by gender";
        assert!(QueryId::from_label(Catalog::Obesity, label).is_some());
        assert!(QueryId::from_label(Catalog::Malnutrition, label).is_none());
    }

    #[test]
    fn default_query_is_first_entry() {
        for catalog in Catalog::ALL {
            assert_eq!(catalog.default_query(), catalog.queries()[0]);
        }
    }

    #[test]
    fn catalog_names() {
        for catalog in Catalog::ALL {
            assert_eq!(Catalog::from_name(catalog.name()), Some(catalog));
        }
        assert_eq!(Catalog::from_name("other"), None);
    }

    #[test]
    fn thresholds_are_preserved() {
        let low = QueryId::Obesity(ObesityQuery::ConsistentLow).sql();
        assert!(low.contains("HAVING Avg_Obesity < 25 AND Avg_CI < 3"));
        assert!(low.contains("LIMIT 10"));

        let gap = QueryId::Obesity(ObesityQuery::FemaleExceedsMale).sql();
        assert!(gap.contains("HAVING Gender_Gap > 5"));

        let flags = QueryId::Malnutrition(MalnutritionQuery::HighCiFlags).sql();
        assert!(flags.contains("WHERE CI_Width > 5"));

        let inc = QueryId::Malnutrition(MalnutritionQuery::Increasing).sql();
        assert!(inc.contains("HAVING Increase > 0"));
    }

    #[test]
    fn queries_target_their_tables() {
        for q in Catalog::Obesity.queries() {
            assert!(q.sql().contains("FROM obesity"), "{}", q.label());
            assert!(!q.sql().contains("malnutrition"), "{}", q.label());
        }
        for q in Catalog::Malnutrition.queries() {
            assert!(q.sql().contains("FROM malnutrition"), "{}", q.label());
        }
        for q in Catalog::Combined.queries() {
            assert!(q.sql().contains("obesity"), "{}", q.label());
            assert!(q.sql().contains("malnutrition"), "{}", q.label());
        }
    }
}
