/*!

This is the long-form manual for `party_resolution` and `escrutinio`.

## Resolution rules

A ballot label goes through these steps, and the first one that applies wins:

1. The label is upper-cased, trimmed and its dots are removed (`P.R.C.` is `PRC`).
   An empty label resolves to `OTHER`, displayed as `?`.
2. Alianza Popular and the coalitions built around it (`AP`, `AP-PDP`, `CP`, `CD`,
   `COALICIÓN POPULAR`, ...) depend on the date:
   * in the May 2023 municipal elections, the Catalan `AP` line is socialist: `PSOE`.
   * before 1989, or when the year is unknown: `AP`.
   * from 1989 on: `AP-OTHER`. This bucket is never merged with anything.
3. `PP` or `PARTIDO POPULAR` before 1989 is a mislabelled AP record: `AP`.
4. The patterns of [`crate::tables`], in order. A party name must appear as a
   whole token: `PSOE-A` is PSOE, `PSOEX` is not. Coalitions (En Marea,
   En Comú Podem) come before the general Podemos pattern.
5. Exact aliases for the spellings no pattern catches (`ICV-EUIA`, `U.P.N.`, ...). The canonical id is also the display label.
6. Groups: regional alliances such as `PP-FORO` take the color of their parent
   (`PP`) and keep their own name. They are flagged with `is_group_child`.
7. Anything else is its own party, with the default color.

## Aggregation

[`crate::aggregate_results`] merges the rows that **display** identically: `PP`
and `P.P.` become one row, while `PP-FORO` stays separate from `PP` even though
both share the same canonical id and color. The regional and historical views
([`crate::regions`], [`crate::history`]) merge by canonical id instead.

Rows are sorted by descending votes. The order among rows with the same number
of votes follows the input and should not be relied upon.

## Coalitions

[`crate::coalition::evaluate`] counts a vote over the seat rows of an aggregation.
Each party votes yes, abstains or votes no (the default). The absolute majority is
half the seats plus one, rounded down; a simple majority only needs more yes than
no. [`crate::coalition::chamber_majority`] gives the fixed majority of a full
chamber instead: 176 deputies, or half of the 8131 municipalities.

## Command line

```bash
escrutinio --input data/processed/congreso_2019_11.json
escrutinio --input data/processed/congreso_2019_11.json --scope regions
escrutinio --scope history --input congreso_1982_10.json --input congreso_2019_11.json
escrutinio --scope coalition --input congreso_2019_11.json --yes PSOE --yes ERC --abstain PP
escrutinio --scope party-config
```

The input files are the processed JSON payloads:

```json
{
  "metadata": {"year": 2019, "type": "02"},
  "candidacies": {"0001": {"siglas": "PSOE", "name": "Partido Socialista Obrero Español"}},
  "summary": {"0001": {"votes": 6792199, "seats": 120}},
  "provinces": {"28": {"votes": {"0001": 1000}, "seats": {"0001": 10}}},
  "municipalities": {"28079": {"prov": "28", "votes": {"0001": 300}}}
}
```

The election id, used for the resolution context, is taken from `--election-id` or
from the file name (`congreso_2019_11.json`). The year comes from `--year`, the
metadata or the election id, in that order.

*/
