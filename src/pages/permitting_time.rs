// src/pages/permitting_time.rs
//
// The permitting-time analysis: narrative prose, two fixed per-city charts,
// a checklist-driven comparison chart, and a dropdown-driven combined chart.

use super::{markdown, Block, Page};
use crate::bind::{recompute, Selection};
use crate::chart::single_city_chart;
use crate::dataset::PermitTable;

pub const CHECKLIST_ID: &str = "city_checklist";
pub const CHECKLIST_GRAPH_ID: &str = "sf_permitting_time_graph";
pub const DROPDOWN_ID: &str = "city_dropdown";
pub const DETAIL_GRAPH_ID: &str = "city_detail_graph";

pub const DEFAULT_CHECKLIST_CITIES: &[&str] = &["Kirkland"];
pub const DEFAULT_DETAIL_CITY: &str = "Kirkland";

/// Initial checklist selection, restricted to cities actually in the table.
pub fn default_checklist_selection() -> Selection {
    Selection::cities(DEFAULT_CHECKLIST_CITIES.iter().copied())
}

pub fn default_detail_selection() -> Selection {
    Selection::city(DEFAULT_DETAIL_CITY)
}

pub fn page(table: &PermitTable) -> Page {
    let options: Vec<String> = table.cities().to_vec();

    Page {
        path: "/permitting-time".to_string(),
        title: "Permitting Time".to_string(),
        blocks: vec![
            markdown("# Permitting Time"),
            Block::Rule,
            markdown(INTRO),
            markdown(KIRKLAND_NOTES),
            Block::Graph {
                id: "kirkland_graph".to_string(),
                figure: single_city_chart(table, "Kirkland"),
            },
            markdown(BELLEVUE_NOTES),
            Block::Graph {
                id: "bellevue_graph".to_string(),
                figure: single_city_chart(table, "Bellevue"),
            },
            markdown(COMPARISON_NOTES),
            markdown(OTHER_CITIES),
            Block::Checklist {
                id: CHECKLIST_ID.to_string(),
                options: options.clone(),
                selected: DEFAULT_CHECKLIST_CITIES
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            Block::Graph {
                id: CHECKLIST_GRAPH_ID.to_string(),
                figure: recompute(table, &default_checklist_selection()),
            },
            markdown(CITY_DETAIL),
            Block::Dropdown {
                id: DROPDOWN_ID.to_string(),
                options,
                selected: DEFAULT_DETAIL_CITY.to_string(),
            },
            Block::Graph {
                id: DETAIL_GRAPH_ID.to_string(),
                figure: recompute(table, &default_detail_selection()),
            },
            markdown(DATA_NOTES),
            Block::Rule,
            markdown(CONTACT),
        ],
    }
}

const INTRO: &str = "\
One of the many sources of uncertainty for housing developers is the amount of \
time it takes to get a permit to build housing. In general, getting a building \
permit used to be relatively quick and easy, however permitting times have \
been increasing in recent years. While permitting times did skyrocket during \
the pandemic, this problem predates covid.

For the purpose of this analysis, I'm measuring permitting time by calculating \
the number of days between the date a permit was issued and the date the \
permit application for that same permit was submitted. Due to data quality \
issues, this analysis only uses permit applications for new single family \
homes. I'll be primarily focusing on permitting data for the cities of \
Kirkland, WA and Bellevue, WA.
";

const KIRKLAND_NOTES: &str = "\
## Kirkland
This graph of the median number of days between permit application and issue \
dates for new single family home permits over time in the City of Kirkland \
shows a few patterns:

1. A slow increase from 1998 to 2003, peaking at a median permit time of ~150 days.
2. A sharp decrease in permitting time through 2003, reaching a median permit time of ~75 days.
3. An increase to ~115 days in 2006 that holds until late 2009.
4. A short bump from a baseline ~75 days to ~100 days that starts in July 2010 and returns to the baseline by December 2011.
5. An increase starting mid 2013 that reachs ~100 days and stays there for 2015.
6. A sharp increase starting in 2016 that levels off around ~150 days.
7. Another sharp increase starting around June/July 2020 that hasn't stopped increasing with median permitting times as of July 2023 reaching over 250 days.
";

const BELLEVUE_NOTES: &str = "\
## Bellevue
This graph of the median number of days between permit application and issue \
dates for new single family home permits over time in the City of Bellevue \
shows a few patterns:

1. A decrease in permitting time in 2003, at roughly the same time as Kirkland's 2003 decrease.
2. A drastic increase in permitting time starting in mid 2007, peaking in 2009, and returning the the previous baseline in 2010.
3. A slow increase stretching from late 2012 to January 2016.
4. Permitting times stayed roughly the same in Bellevue from January 2016 to September 2022.
5. A drastic rise in permitting times starting in September 2022 with no end in sight as of July 2023.
";

const COMPARISON_NOTES: &str = "\
Some notes:

1. Both Kirkland and Bellevue saw significant decreases in permitting time in 2003.
2. Both Kirkland and Bellevue saw increases in permitting time around the 2008 crash, but with signficantly different magnitudes.
3. Both Kirkland and Bellevue saw increases in permitting time around 2011, but Kirkland saw a larger increase.
4. Both Kirkland and Bellevue saw increases in permitting time from 2012 to 2017 but Bellevue's permitting times started to increase about a year before Kirkland. Additionally, in 2012, Kirkland had a lower median permitting time than Bellevue, but ended up at roughly the same place by 2017.
5. Kirkland saw an increase in permitting times shortly after the pandemic hit, but Bellevue's permitting times didn't see a similar increase until 2022.
";

const OTHER_CITIES: &str = "\
## Other Cities
Using public records requests, I obtained data on the permit application date \
and permit issue date for new construction single family permits in various \
cities (among other permits). The graph below shows the median number of days \
between the permit application date and the permit issue date for all permits \
in a 365 day lookback window from the date show on the x-axis.
";

const CITY_DETAIL: &str = "\
## Permit Volume
Permitting time only tells half the story; the number of applications a city \
receives matters too. Pick a city below to see its median permitting time \
alongside the number of applications in the same trailing 365 day window, \
plotted on separate axes.
";

const DATA_NOTES: &str = "\
The data shown here comes from public records requests submitted around \
June/July 2023.

In my public records requests, I was able to get the permitting data for all \
permits in the various cities' databases, including multifamily permits. \
However, these cities see so few multifamily permits that it's difficult to \
make a trustworthy graph showing the permitting time for multifamily permits.
";

const CONTACT: &str = "\
If you have any questions and/or would like to see the original permit data \
used for this analysis, please reach out to me at aaron@kirklanddata.com
";
