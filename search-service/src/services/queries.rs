use serde::Serialize;

/// A named, parameterless analysis over the whole `books` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NamedQuery {
    pub name: &'static str,
    pub sql: &'static str,
}

// "Publisher" analyses group by Book_Authors; no publisher column is ingested.
const STANDARD_QUERIES: &[NamedQuery] = &[
    NamedQuery {
        name: "Check Availability of eBooks vs Physical Books",
        sql: r#"
            SELECT
                CASE WHEN IsEbook = 1 THEN 'eBooks' ELSE 'Physical Books' END AS Book_Type,
                COUNT(*) AS Count
            FROM Books
            GROUP BY IsEbook;
        "#,
    },
    NamedQuery {
        name: "Find the Publisher with the Most Books Published",
        sql: r#"
            SELECT
                Book_Authors AS Publisher,
                COUNT(*) AS Num_Books
            FROM Books
            WHERE Book_Authors IS NOT NULL AND TRIM(Book_Authors) != ''
            GROUP BY Book_Authors
            ORDER BY Num_Books DESC
            LIMIT 10;
        "#,
    },
    NamedQuery {
        name: "Identify the Publisher with the Highest Average Rating",
        sql: r#"
            SELECT
                Book_Authors AS Publisher,
                AVG(AverageRating) AS Avg_Rating
            FROM Books
            WHERE AverageRating IS NOT NULL
                AND Book_Authors IS NOT NULL
                AND TRIM(Book_Authors) != ''
            GROUP BY Book_Authors
            ORDER BY Avg_Rating DESC
            LIMIT 10;
        "#,
    },
    NamedQuery {
        name: "Get the Top 5 Most Expensive Books by Retail Price",
        sql: r#"
            SELECT
                Book_Title AS Book_Title,
                Amount_RetailPrice AS Amount_RetailPrice,
                CurrencyCode_RetailPrice AS CurrencyCode_RetailPrice
            FROM Books
            WHERE Amount_RetailPrice IS NOT NULL
            ORDER BY Amount_RetailPrice DESC
            LIMIT 5;
        "#,
    },
    NamedQuery {
        name: "Find Books Published After 2010 with at Least 500 Pages",
        sql: r#"
            SELECT
                Book_Title AS Book_Title,
                PageCount AS PageCount,
                Year AS Year
            FROM books
            WHERE Year >= '2010' AND PageCount >= 500;
        "#,
    },
    NamedQuery {
        name: "List Books with Discounts Greater than 20%",
        sql: r#"
            SELECT
                Book_Title AS Book_Title,
                Amount_ListPrice AS Amount_ListPrice,
                Amount_RetailPrice AS Amount_RetailPrice,
                100 - (Amount_RetailPrice * 100.0 / Amount_ListPrice) AS Discount_Percentage
            FROM books
            WHERE Amount_ListPrice > 0
                AND Amount_RetailPrice > 0
                AND (100 - (Amount_RetailPrice * 100.0 / Amount_ListPrice)) > 20;
        "#,
    },
    NamedQuery {
        name: "Find the Average Page Count for eBooks vs Physical Books",
        sql: r#"
            SELECT
                CASE WHEN IsEbook = 1 THEN 'eBooks' ELSE 'Physical Books' END AS Book_Type,
                AVG(PageCount) AS Avg_Page_Count
            FROM books
            WHERE PageCount IS NOT NULL
            GROUP BY IsEbook;
        "#,
    },
    NamedQuery {
        name: "Find the Top 3 Authors with the Most Books",
        sql: r#"
            SELECT
                Book_Authors AS Book_Authors,
                COUNT(*) AS Num_Books
            FROM books
            WHERE Book_Authors IS NOT NULL AND TRIM(Book_Authors) != ''
            GROUP BY Book_Authors
            ORDER BY Num_Books DESC
            LIMIT 3;
        "#,
    },
    NamedQuery {
        name: "List Publishers with More than 10 Books",
        sql: r#"
            SELECT
                Book_Authors AS Publisher,
                COUNT(*) AS Num_Books
            FROM books
            WHERE Book_Authors IS NOT NULL AND TRIM(Book_Authors) != ''
            GROUP BY Book_Authors
            HAVING Num_Books > 10;
        "#,
    },
    NamedQuery {
        name: "Find the Average Page Count for Each Category",
        sql: r#"
            SELECT
                Categories AS Categories,
                AVG(PageCount) AS Avg_Page_Count
            FROM books
            WHERE Categories IS NOT NULL AND PageCount IS NOT NULL
            GROUP BY Categories
            ORDER BY Avg_Page_Count DESC;
        "#,
    },
    NamedQuery {
        name: "Retrieve Books with More than 3 Authors",
        sql: r#"
            SELECT
                Book_Title AS Book_Title,
                Book_Authors AS Book_Authors
            FROM books
            WHERE LENGTH(Book_Authors) - LENGTH(REPLACE(Book_Authors, ',', '')) + 1 > 3;
        "#,
    },
    NamedQuery {
        name: "Books with Ratings Count Greater Than the Average",
        sql: r#"
            SELECT
                Book_Title AS Book_Title,
                RatingsCount AS RatingsCount
            FROM books
            WHERE RatingsCount > (SELECT AVG(RatingsCount) FROM books);
        "#,
    },
    NamedQuery {
        name: "Books with the Same Author Published in the Same Year",
        sql: r#"
            SELECT
                Book_Authors AS Book_Author,
                Year AS Year,
                COUNT(*) AS Num_Books
            FROM books
            WHERE Book_Authors IS NOT NULL AND Year IS NOT NULL AND TRIM(Book_Authors) != ''
            GROUP BY Book_Authors, Year
            HAVING Num_Books > 1;
        "#,
    },
    NamedQuery {
        name: "Books with a Specific Keyword in the Title",
        sql: r#"
            SELECT
                Book_Title AS BookTitle_SameAsKeyword
            FROM books;
        "#,
    },
    NamedQuery {
        name: "Year with the Highest Average Book Price",
        sql: r#"
            SELECT
                SUBSTR(Year, 1, 4) AS Publication_Year,
                AVG(Amount_RetailPrice) AS Avg_Price
            FROM books
            WHERE Year IS NOT NULL
            GROUP BY Publication_Year
            ORDER BY Avg_Price DESC
            LIMIT 1;
        "#,
    },
    NamedQuery {
        name: "Count Authors Who Published 3 Consecutive Years",
        sql: r#"
            SELECT
                Book_Authors AS Book_Authors,
                COUNT(DISTINCT SUBSTR(Year, 1, 4)) AS Consecutive_Years
            FROM books
            WHERE Year IS NOT NULL
                AND Book_Authors IS NOT NULL
                AND TRIM(Book_Authors) != ''
            GROUP BY Book_Authors
            HAVING Consecutive_Years >= 3;
        "#,
    },
    NamedQuery {
        name: "Authors Published Books in Same Year, Different Publishers",
        sql: r#"
            SELECT
                Book_Authors AS Book_Authors,
                SUBSTR(Year, 1, 4) AS Publication_Year,
                COUNT(DISTINCT Book_Authors) AS Num_Publishers
            FROM books
            WHERE Book_Authors IS NOT NULL
            GROUP BY Book_Authors, Publication_Year
            HAVING Num_Publishers > 1;
        "#,
    },
    NamedQuery {
        name: "Average Retail Price of eBooks vs Physical Books",
        sql: r#"
            SELECT
                AVG(CASE WHEN IsEbook = 1 THEN Amount_RetailPrice END) AS Avg_Ebook_Price,
                AVG(CASE WHEN IsEbook = 0 THEN Amount_RetailPrice END) AS Avg_Physical_Price
            FROM books
            HAVING COUNT(*) > 0;
        "#,
    },
    NamedQuery {
        name: "Books with Ratings Far from Average (Outliers)",
        sql: r#"
            SELECT
                Book_Title AS Book_Title, AverageRating AS AverageRating, RatingsCount AS RatingCount
            FROM books
            WHERE ABS(AverageRating - (SELECT AVG(AverageRating) FROM books)) >
                (2 * (SELECT SUM((AverageRating - (SELECT AVG(AverageRating) FROM books)) *
                    (AverageRating - (SELECT AVG(AverageRating) FROM books)))
                    / COUNT(AverageRating)
                FROM books));
        "#,
    },
    NamedQuery {
        name: "Publisher with Highest Average Rating (Min 10 Books)",
        sql: r#"
            SELECT
                Book_Authors AS Publisher,
                AVG(AverageRating) AS Avg_Rating,
                COUNT(*) AS Num_Books
            FROM books
            WHERE AverageRating IS NOT NULL
                AND Book_Authors IS NOT NULL
                AND TRIM(Book_Authors) != ''
            GROUP BY Book_Authors
            HAVING Num_Books > 10
            ORDER BY Avg_Rating DESC
            LIMIT 1;
        "#,
    },
];

/// Ordered list of analyses. Ids are 1-based positions in the list.
#[derive(Debug, Clone)]
pub struct QueryCatalog {
    entries: Vec<NamedQuery>,
}

impl QueryCatalog {
    pub fn new(entries: Vec<NamedQuery>) -> Self {
        Self { entries }
    }

    pub fn standard() -> Self {
        Self::new(STANDARD_QUERIES.to_vec())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &NamedQuery)> {
        self.entries.iter().enumerate().map(|(i, query)| (i + 1, query))
    }

    /// Looks a query up by exact name, falling back to its 1-based id.
    pub fn resolve(&self, selector: &str) -> Option<(usize, &NamedQuery)> {
        if let Some(found) = self.iter().find(|(_, query)| query.name == selector) {
            return Some(found);
        }
        let id: usize = selector.trim().parse().ok()?;
        self.iter().find(|(i, _)| *i == id)
    }
}
